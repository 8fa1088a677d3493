//! Smoothing filters: Mean, Gaussian and Bilateral.

use crate::core::buffer::{clamp_sample, PixelBuffer};
use crate::core::error::{ImagingError, ImagingResult};
use crate::core::filter::{Category, ConvolutionFilter, Filter, FilterMetadata, KernelSize};
use crate::core::params::{Constraint, ParameterDefinition};
use crate::core::types::{ParamType, Value};
use crate::filters::registry::FilterRegistry;

/// Register smoothing filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|p| MeanFilter::new(p.integer("kernel_size")?));
    registry.register(|p| GaussianFilter::new(p.integer("kernel_size")?, p.float("sigma")?));
    registry.register(|p| {
        BilateralFilter::new(
            p.integer("kernel_size")?,
            p.float("sigma_spatial")?,
            p.float("sigma_range")?,
        )
    });
}

pub(crate) fn kernel_size_parameter(default: i64) -> ParameterDefinition {
    ParameterDefinition::new("kernel_size", ParamType::Integer, Value::Integer(default))
        .with_description("Window side length (odd, at least 1)")
        .with_constraint(Constraint::MinValue(1.0))
}

fn check_sigma(name: &str, sigma: f64) -> ImagingResult<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ImagingError::invalid_parameter(name, sigma, "must be positive"));
    }
    Ok(())
}

/// Box filter: the average of the in-bounds taps of the window.
///
/// Border pixels average fewer taps, so a constant image stays constant.
#[derive(Debug, Clone)]
pub struct MeanFilter {
    kernel: KernelSize,
}

impl MeanFilter {
    /// Create a mean filter of the given odd size.
    pub fn new(kernel_size: i64) -> ImagingResult<Self> {
        Ok(Self {
            kernel: KernelSize::new(kernel_size)?,
        })
    }
}

impl Default for MeanFilter {
    fn default() -> Self {
        Self {
            kernel: KernelSize(3),
        }
    }
}

impl Filter for MeanFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("mean", "Mean Filter")
            .description("Average every sample with its neighbours using uniform weights")
            .category(Category::Smoothing)
            .parameter(kernel_size_parameter(3))
            .tags(["blur", "box", "average"])
            .build()
    }

    fn name(&self) -> String {
        "Mean Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!(
            "mean {}x{} on {}x{}x{}",
            self.kernel.size(),
            self.kernel.size(),
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );
        let r = self.kernel.radius() as isize;
        let source = buffer.clone();
        buffer.fill_with(|y, x, c| {
            let mut sum = 0.0;
            let mut count = 0usize;
            for dy in -r..=r {
                for dx in -r..=r {
                    if let Some((ny, nx)) = source.offset(y, x, dy, dx) {
                        sum += source.at(ny, nx, c);
                        count += 1;
                    }
                }
            }
            // empty window keeps the centre sample
            if count == 0 {
                source.at(y, x, c)
            } else {
                clamp_sample(sum / count as f64)
            }
        });
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

/// Gaussian filter with a kernel normalised to sum 1 at construction.
#[derive(Debug, Clone)]
pub struct GaussianFilter {
    kernel: KernelSize,
    sigma: f64,
    weights: Vec<f64>,
}

impl GaussianFilter {
    /// Create a Gaussian filter.
    pub fn new(kernel_size: i64, sigma: f64) -> ImagingResult<Self> {
        let kernel = KernelSize::new(kernel_size)?;
        check_sigma("sigma", sigma)?;
        Ok(Self::build(kernel, sigma))
    }

    fn build(kernel: KernelSize, sigma: f64) -> Self {
        let r = kernel.radius() as isize;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let mut weights: Vec<f64> = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dy, dx)))
            .map(|(dy, dx)| (-((dx * dx + dy * dy) as f64) / two_sigma_sq).exp())
            .collect();
        let sum: f64 = weights.iter().sum();
        weights.iter_mut().for_each(|w| *w /= sum);
        Self {
            kernel,
            sigma,
            weights,
        }
    }

    /// Standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Row-major kernel weights, `size²` entries summing to 1.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Default for GaussianFilter {
    fn default() -> Self {
        Self::build(KernelSize(5), 1.0)
    }
}

impl Filter for GaussianFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("gaussian", "Gaussian Filter")
            .description("Weighted average with a normalised Gaussian kernel")
            .category(Category::Smoothing)
            .parameter(kernel_size_parameter(5))
            .parameter(
                ParameterDefinition::new("sigma", ParamType::Float, Value::Float(1.0))
                    .with_description("Blur intensity (standard deviation)")
                    .with_constraint(Constraint::Positive),
            )
            .tags(["blur", "smooth", "noise"])
            .build()
    }

    fn name(&self) -> String {
        "Gaussian Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!(
            "gaussian {}x{} sigma={} on {}x{}x{}",
            self.kernel.size(),
            self.kernel.size(),
            self.sigma,
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );
        self.convolve(buffer);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

impl ConvolutionFilter for GaussianFilter {
    fn kernel_size(&self) -> KernelSize {
        self.kernel
    }

    fn weight(&self, dy: isize, dx: isize) -> f64 {
        let r = self.kernel.radius() as isize;
        let size = self.kernel.size() as isize;
        self.weights[((dy + r) * size + (dx + r)) as usize]
    }
}

/// Edge-preserving smoothing.
///
/// Each tap is weighted by its spatial distance and by how far its value is
/// from the centre sample.
#[derive(Debug, Clone)]
pub struct BilateralFilter {
    kernel: KernelSize,
    sigma_spatial: f64,
    sigma_range: f64,
    spatial: Vec<f64>,
}

impl BilateralFilter {
    /// Create a bilateral filter.
    pub fn new(kernel_size: i64, sigma_spatial: f64, sigma_range: f64) -> ImagingResult<Self> {
        let kernel = KernelSize::new(kernel_size)?;
        check_sigma("sigma_spatial", sigma_spatial)?;
        check_sigma("sigma_range", sigma_range)?;
        Ok(Self::build(kernel, sigma_spatial, sigma_range))
    }

    fn build(kernel: KernelSize, sigma_spatial: f64, sigma_range: f64) -> Self {
        let r = kernel.radius() as isize;
        let two_sigma_sq = 2.0 * sigma_spatial * sigma_spatial;
        let spatial = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dy, dx)))
            .map(|(dy, dx)| (-((dx * dx + dy * dy) as f64) / two_sigma_sq).exp())
            .collect();
        Self {
            kernel,
            sigma_spatial,
            sigma_range,
            spatial,
        }
    }
}

impl Default for BilateralFilter {
    fn default() -> Self {
        Self::build(KernelSize(5), 50.0, 50.0)
    }
}

impl Filter for BilateralFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("bilateral", "Bilateral Filter")
            .description("Smooth while preserving edges by also weighting on value difference")
            .category(Category::Smoothing)
            .parameter(kernel_size_parameter(5))
            .parameter(
                ParameterDefinition::new("sigma_spatial", ParamType::Float, Value::Float(50.0))
                    .with_description("Spatial standard deviation")
                    .with_constraint(Constraint::Positive),
            )
            .parameter(
                ParameterDefinition::new("sigma_range", ParamType::Float, Value::Float(50.0))
                    .with_description("Intensity standard deviation")
                    .with_constraint(Constraint::Positive),
            )
            .tags(["blur", "edge-preserving", "denoise"])
            .build()
    }

    fn name(&self) -> String {
        "Bilateral Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!(
            "bilateral {}x{} sigma_s={} sigma_r={} on {}x{}x{}",
            self.kernel.size(),
            self.kernel.size(),
            self.sigma_spatial,
            self.sigma_range,
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );
        let r = self.kernel.radius() as isize;
        let size = self.kernel.size() as isize;
        let two_range_sq = 2.0 * self.sigma_range * self.sigma_range;
        let source = buffer.clone();

        buffer.fill_with(|y, x, c| {
            let center = source.at(y, x, c);
            let mut sum = 0.0;
            let mut weight_sum = 0.0;
            for dy in -r..=r {
                for dx in -r..=r {
                    let Some((ny, nx)) = source.offset(y, x, dy, dx) else {
                        continue;
                    };
                    let neighbor = source.at(ny, nx, c);
                    let diff = neighbor - center;
                    let weight = self.spatial[((dy + r) * size + (dx + r)) as usize]
                        * (-(diff * diff) / two_range_sq).exp();
                    sum += weight * neighbor;
                    weight_sum += weight;
                }
            }
            if weight_sum > 0.0 {
                clamp_sample(sum / weight_sum)
            } else {
                clamp_sample(center)
            }
        });
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(width: usize, height: usize, value: f64) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height, 1).unwrap();
        buffer.fill(value);
        buffer
    }

    #[test]
    fn test_gaussian_kernel_sums_to_one() {
        for (size, sigma) in [(1, 0.5), (3, 1.0), (5, 1.4), (7, 3.0), (9, 0.2)] {
            let filter = GaussianFilter::new(size, sigma).unwrap();
            let sum: f64 = filter.weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "size {} sigma {}", size, sigma);
        }
    }

    #[test]
    fn test_gaussian_invalid_parameters() {
        assert!(matches!(
            GaussianFilter::new(5, 0.0),
            Err(ImagingError::InvalidParameter { .. })
        ));
        assert!(GaussianFilter::new(5, -1.0).is_err());
        assert!(GaussianFilter::new(5, f64::NAN).is_err());
        assert_eq!(
            GaussianFilter::new(4, 1.0).unwrap_err(),
            ImagingError::InvalidKernelSize(4)
        );
    }

    #[test]
    fn test_mean_interior_and_border() {
        let mut buffer = constant(3, 3, 90.0);
        MeanFilter::new(3).unwrap().apply(&mut buffer).unwrap();
        // centre averages nine taps, corner four, edge six
        assert!((buffer.sample(1, 1, 0).unwrap() - 90.0).abs() < 1e-9);
        assert!((buffer.sample(0, 0, 0).unwrap() - 90.0).abs() < 1e-9);
        assert!((buffer.sample(0, 1, 0).unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_border_divides_by_tap_count() {
        let mut buffer = PixelBuffer::new(3, 3, 1).unwrap();
        buffer.set_sample(0, 0, 0, 80.0).unwrap();
        MeanFilter::new(3).unwrap().apply(&mut buffer).unwrap();
        // corner window holds 80 and three zeros
        assert!((buffer.sample(0, 0, 0).unwrap() - 20.0).abs() < 1e-9);
        // edge window (0, 1) holds 80 and five zeros
        assert!((buffer.sample(0, 1, 0).unwrap() - 80.0 / 6.0).abs() < 1e-9);
        assert!((buffer.sample(1, 1, 0).unwrap() - 80.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_size_one_is_identity() {
        let bytes: Vec<u8> = (0..12).map(|i| i * 20).collect();
        let mut buffer = PixelBuffer::from_interleaved_bytes(2, 2, &bytes).unwrap();
        let before = buffer.clone();
        MeanFilter::new(1).unwrap().apply(&mut buffer).unwrap();
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_gaussian_preserves_constant_interior() {
        let mut buffer = constant(7, 7, 128.0);
        GaussianFilter::new(3, 1.0).unwrap().apply(&mut buffer).unwrap();
        assert!((buffer.sample(3, 3, 0).unwrap() - 128.0).abs() < 1e-9);
        // skipped taps darken the corner
        assert!(buffer.sample(0, 0, 0).unwrap() < 128.0);
    }

    #[test]
    fn test_bilateral_keeps_constant_image() {
        let mut buffer = constant(5, 5, 200.0);
        BilateralFilter::new(5, 50.0, 50.0).unwrap().apply(&mut buffer).unwrap();
        assert!(buffer.as_slice().iter().all(|&v| (v - 200.0).abs() < 1e-9));
    }

    #[test]
    fn test_bilateral_preserves_strong_edge() {
        let mut buffer = PixelBuffer::new(6, 1, 1).unwrap();
        for x in 3..6 {
            buffer.set_sample(0, x, 0, 255.0).unwrap();
        }
        BilateralFilter::new(3, 5.0, 10.0).unwrap().apply(&mut buffer).unwrap();
        assert!(buffer.sample(0, 2, 0).unwrap() < 1.0);
        assert!(buffer.sample(0, 3, 0).unwrap() > 254.0);
    }

    #[test]
    fn test_bilateral_invalid_sigmas() {
        assert!(BilateralFilter::new(5, 0.0, 10.0).is_err());
        assert!(matches!(
            BilateralFilter::new(5, 10.0, -2.0),
            Err(ImagingError::InvalidParameter { ref name, .. }) if name == "sigma_range"
        ));
    }

    #[test]
    fn test_metadata_ids() {
        assert_eq!(MeanFilter::default().metadata().id, "mean");
        assert_eq!(GaussianFilter::default().metadata().parameters.len(), 2);
        assert_eq!(BilateralFilter::default().metadata().category, Category::Smoothing);
    }
}
