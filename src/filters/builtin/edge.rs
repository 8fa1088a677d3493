//! Edge detection filters: Sobel, Prewitt and Canny.
//!
//! Gradient masks are applied by correlation over interior pixels only. The
//! one-pixel border is always written as 0. Sobel and Prewitt reject images
//! narrower or shorter than the 3x3 mask.

use crate::core::buffer::{clamp_sample, PixelBuffer};
use crate::core::error::{ImagingError, ImagingResult};
use crate::core::filter::{Category, Filter, FilterMetadata};
use crate::core::parallel::for_each_row;
use crate::core::params::{Constraint, ParameterDefinition};
use crate::core::types::{ParamType, Value};
use crate::filters::builtin::smoothing::GaussianFilter;
use crate::filters::registry::FilterRegistry;

/// Register edge detection filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|_| Ok(SobelFilter));
    registry.register(|_| Ok(PrewittFilter));
    registry.register(|p| CannyFilter::new(p.float("low_threshold")?, p.float("high_threshold")?));
}

type Mask = [[f64; 3]; 3];

const SOBEL_X: Mask = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: Mask = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const PREWITT_X: Mask = [[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]];
const PREWITT_Y: Mask = [[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

/// Correlate both masks at interior pixel `(y, x)` of channel `c`.
#[inline]
fn correlate(
    source: &PixelBuffer,
    y: usize,
    x: usize,
    c: usize,
    mx: &Mask,
    my: &Mask,
) -> (f64, f64) {
    let mut gx = 0.0;
    let mut gy = 0.0;
    for (ky, (row_x, row_y)) in mx.iter().zip(my).enumerate() {
        for kx in 0..3 {
            let v = source.at(y + ky - 1, x + kx - 1, c);
            gx += v * row_x[kx];
            gy += v * row_y[kx];
        }
    }
    (gx, gy)
}

#[inline]
fn is_interior(y: usize, x: usize, width: usize, height: usize) -> bool {
    y >= 1 && x >= 1 && y + 1 < height && x + 1 < width
}

/// Fail unless the buffer holds at least one full 3x3 window.
fn check_mask_fits(buffer: &PixelBuffer) -> ImagingResult<()> {
    if buffer.width() < 3 || buffer.height() < 3 {
        return Err(ImagingError::ImageTooSmall {
            width: buffer.width(),
            height: buffer.height(),
            min_width: 3,
            min_height: 3,
        });
    }
    Ok(())
}

/// Gradient magnitude of every channel, clamped, border zeroed.
fn gradient_magnitude(buffer: &mut PixelBuffer, mx: &Mask, my: &Mask) {
    let (width, height, _) = buffer.dimensions();
    let source = buffer.clone();
    buffer.fill_with(|y, x, c| {
        if !is_interior(y, x, width, height) {
            return 0.0;
        }
        let (gx, gy) = correlate(&source, y, x, c, mx, my);
        clamp_sample((gx * gx + gy * gy).sqrt())
    });
}

/// Sobel gradient magnitude.
#[derive(Debug, Clone, Default)]
pub struct SobelFilter;

impl Filter for SobelFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("sobel", "Sobel Filter")
            .description("Gradient magnitude from the 3x3 Sobel masks")
            .category(Category::Edge)
            .tags(["edges", "gradient", "derivative"])
            .build()
    }

    fn name(&self) -> String {
        "Sobel Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        check_mask_fits(buffer)?;
        log::debug!(
            "sobel on {}x{}x{}",
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );
        gradient_magnitude(buffer, &SOBEL_X, &SOBEL_Y);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

/// Prewitt gradient magnitude.
#[derive(Debug, Clone, Default)]
pub struct PrewittFilter;

impl Filter for PrewittFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("prewitt", "Prewitt Filter")
            .description("Gradient magnitude from the 3x3 Prewitt masks")
            .category(Category::Edge)
            .tags(["edges", "gradient", "derivative"])
            .build()
    }

    fn name(&self) -> String {
        "Prewitt Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        check_mask_fits(buffer)?;
        log::debug!(
            "prewitt on {}x{}x{}",
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );
        gradient_magnitude(buffer, &PREWITT_X, &PREWITT_Y);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

/// Multi-stage Canny edge detector.
///
/// Runs Gaussian smoothing (5x5, σ=1.4), Sobel gradients on channel 0,
/// non-maximum suppression along the quantised gradient direction, then
/// double-threshold hysteresis against the 8-neighbourhood. The output is
/// binary and written to every channel.
#[derive(Debug, Clone)]
pub struct CannyFilter {
    low: f64,
    high: f64,
}

impl CannyFilter {
    /// Create a detector with hysteresis thresholds `0 <= low < high <= 255`.
    pub fn new(low: f64, high: f64) -> ImagingResult<Self> {
        let in_range = |t: f64| (0.0..=255.0).contains(&t);
        if !in_range(low) || !in_range(high) || high <= low {
            return Err(ImagingError::InvalidThreshold { low, high });
        }
        Ok(Self { low, high })
    }

    /// Low hysteresis threshold.
    pub fn low_threshold(&self) -> f64 {
        self.low
    }

    /// High hysteresis threshold.
    pub fn high_threshold(&self) -> f64 {
        self.high
    }

    /// Gradient magnitude and direction in degrees `[0, 180]` of channel 0.
    fn gradients(source: &PixelBuffer) -> Vec<(f64, f64)> {
        let (width, height, _) = source.dimensions();
        let mut gradients = vec![(0.0, 0.0); width * height];
        for_each_row(&mut gradients, width, |y, row| {
            for (x, cell) in row.iter_mut().enumerate() {
                if !is_interior(y, x, width, height) {
                    continue;
                }
                let (gx, gy) = correlate(source, y, x, 0, &SOBEL_X, &SOBEL_Y);
                let mut angle = gy.atan2(gx).to_degrees();
                if angle < 0.0 {
                    angle += 180.0;
                }
                *cell = ((gx * gx + gy * gy).sqrt(), angle);
            }
        });
        gradients
    }

    /// Zero every magnitude that is not a local maximum across the edge.
    fn suppress(gradients: &[(f64, f64)], width: usize, height: usize) -> Vec<f64> {
        let mag = |y: usize, x: usize| gradients[y * width + x].0;
        let mut suppressed = vec![0.0; width * height];
        for_each_row(&mut suppressed, width, |y, row| {
            for (x, cell) in row.iter_mut().enumerate() {
                if !is_interior(y, x, width, height) {
                    continue;
                }
                let (m, angle) = gradients[y * width + x];
                let (n1, n2) = if !(22.5..157.5).contains(&angle) {
                    (mag(y, x - 1), mag(y, x + 1))
                } else if angle < 67.5 {
                    (mag(y - 1, x + 1), mag(y + 1, x - 1))
                } else if angle < 112.5 {
                    (mag(y - 1, x), mag(y + 1, x))
                } else {
                    (mag(y - 1, x - 1), mag(y + 1, x + 1))
                };
                if m >= n1 && m >= n2 {
                    *cell = m;
                }
            }
        });
        suppressed
    }

    /// Classify every pixel as edge (255) or background (0).
    fn hysteresis(&self, suppressed: &[f64], width: usize, height: usize) -> Vec<f64> {
        let mut edges = vec![0.0; width * height];
        for_each_row(&mut edges, width, |y, row| {
            for (x, cell) in row.iter_mut().enumerate() {
                let v = suppressed[y * width + x];
                let strong = if v >= self.high {
                    true
                } else if v < self.low {
                    false
                } else {
                    (-1isize..=1).any(|dy| {
                        (-1isize..=1).any(|dx| {
                            let ny = y.checked_add_signed(dy).filter(|&ny| ny < height);
                            let nx = x.checked_add_signed(dx).filter(|&nx| nx < width);
                            match (ny, nx) {
                                (Some(ny), Some(nx)) => suppressed[ny * width + nx] >= self.high,
                                _ => false,
                            }
                        })
                    })
                };
                *cell = if strong { 255.0 } else { 0.0 };
            }
        });
        edges
    }
}

impl Default for CannyFilter {
    fn default() -> Self {
        Self {
            low: 50.0,
            high: 150.0,
        }
    }
}

impl Filter for CannyFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("canny", "Canny Edge Detector")
            .description(
                "Thin binary edges via smoothing, gradients, non-maximum suppression \
                 and hysteresis",
            )
            .category(Category::Edge)
            .parameter(
                ParameterDefinition::new("low_threshold", ParamType::Float, Value::Float(50.0))
                    .with_description("Weak edges below this are dropped")
                    .with_constraint(Constraint::Range { min: 0.0, max: 255.0 }),
            )
            .parameter(
                ParameterDefinition::new("high_threshold", ParamType::Float, Value::Float(150.0))
                    .with_description("Edges at or above this are always kept")
                    .with_constraint(Constraint::Range { min: 0.0, max: 255.0 }),
            )
            .tags(["edges", "hysteresis", "binary"])
            .build()
    }

    fn name(&self) -> String {
        "Canny Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        let (width, height, _) = buffer.dimensions();
        log::debug!(
            "canny low={} high={} on {}x{}x{}",
            self.low,
            self.high,
            width,
            height,
            buffer.channels()
        );

        log::trace!("canny: gaussian smoothing");
        GaussianFilter::new(5, 1.4)?.apply(buffer)?;

        log::trace!("canny: sobel gradients");
        let gradients = Self::gradients(buffer);

        log::trace!("canny: non-maximum suppression");
        let suppressed = Self::suppress(&gradients, width, height);

        log::trace!("canny: hysteresis");
        let edges = self.hysteresis(&suppressed, width, height);

        buffer.fill_with(|y, x, _| edges[y * width + x]);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}
