//! The `Image` facade.
//!
//! An [`Image`] owns the working buffer and one saved snapshot. Point
//! operators are methods here; neighbourhood operators go through any
//! [`Filter`].

pub mod histogram;
pub mod point;

pub use histogram::Histogram;

use crate::core::buffer::PixelBuffer;
use crate::core::color::GrayscaleMethod;
use crate::core::error::ImagingResult;
use crate::core::filter::Filter;
use crate::core::types::FilterSpec;
use crate::filters::registry::FilterRegistry;

/// A working buffer plus the snapshot it can be reset to.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    current: PixelBuffer,
    original: PixelBuffer,
}

impl Image {
    /// Zero-filled image. The snapshot starts as a copy of it.
    pub fn new(width: usize, height: usize, channels: usize) -> ImagingResult<Self> {
        Ok(Self::from_buffer(PixelBuffer::new(width, height, channels)?))
    }

    /// Wrap an existing buffer, snapshotting it.
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            original: buffer.clone(),
            current: buffer,
        }
    }

    /// Build a 3-channel image from decoded row-major RGB bytes.
    pub fn load_from_buffer(bytes: &[u8], width: usize, height: usize) -> ImagingResult<Self> {
        let buffer = PixelBuffer::from_interleaved_bytes(width, height, bytes)?;
        log::debug!("loaded {}x{} RGB image", width, height);
        Ok(Self::from_buffer(buffer))
    }

    /// The working buffer.
    pub fn current(&self) -> &PixelBuffer {
        &self.current
    }

    /// Mutable access to the working buffer.
    pub fn current_mut(&mut self) -> &mut PixelBuffer {
        &mut self.current
    }

    /// The saved snapshot.
    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    /// Consume the image, keeping the working buffer.
    pub fn into_buffer(self) -> PixelBuffer {
        self.current
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.current.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.current.height()
    }

    /// Channel count of the working buffer.
    pub fn channels(&self) -> usize {
        self.current.channels()
    }

    /// Replace the snapshot with a copy of the working buffer.
    pub fn save_original(&mut self) {
        log::debug!("saving snapshot");
        self.original = self.current.clone();
    }

    /// Reset the working buffer to the snapshot.
    pub fn restore_original(&mut self) {
        log::debug!("restoring snapshot");
        self.current = self.original.clone();
    }

    /// Run a neighbourhood filter on the working buffer.
    pub fn apply_filter(&mut self, filter: &dyn Filter) -> ImagingResult<()> {
        filter.apply(&mut self.current)
    }

    /// Build `spec` from `registry` and apply it.
    pub fn apply_spec(
        &mut self,
        registry: &FilterRegistry,
        spec: &FilterSpec,
    ) -> ImagingResult<()> {
        let filter = registry.build(spec)?;
        self.apply_filter(filter.as_ref())
    }

    /// `v <- 255 - v`.
    pub fn negate(&mut self) {
        log::debug!("negate");
        point::negate(&mut self.current);
    }

    /// Binary threshold on luminance.
    pub fn binarize(&mut self, threshold: f64) {
        log::debug!("binarize at {}", threshold);
        point::binarize(&mut self.current, threshold);
    }

    /// Uniform quantisation to `levels` levels, `2 <= levels <= 256`.
    pub fn quantize(&mut self, levels: i64) -> ImagingResult<()> {
        log::debug!("quantize to {} levels", levels);
        point::quantize(&mut self.current, levels)
    }

    /// `v <- clamp(alpha * v + beta)`.
    pub fn enhance(&mut self, alpha: f64, beta: f64) -> ImagingResult<()> {
        log::debug!("enhance alpha={} beta={}", alpha, beta);
        point::enhance(&mut self.current, alpha, beta)
    }

    /// Histogram equalisation of luminance.
    pub fn equalize_histogram(&mut self) {
        log::debug!("equalize histogram");
        point::equalize_histogram(&mut self.current);
    }

    /// Convert to gray with `method`. RGB images drop to one channel.
    pub fn to_grayscale(&mut self, method: GrayscaleMethod) -> ImagingResult<()> {
        log::debug!("grayscale ({})", method.display_name());
        point::to_grayscale(&mut self.current, method)
    }

    /// Apply `f` to every sample, clamping the result.
    pub fn map_samples<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        self.current.map_samples(f);
    }

    /// Luminance histogram of the working buffer.
    pub fn histogram(&self) -> Histogram {
        Histogram::of_luminance(&self.current)
    }
}

impl From<PixelBuffer> for Image {
    fn from(buffer: PixelBuffer) -> Self {
        Self::from_buffer(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ImagingError;
    use crate::filters::builtin::MeanFilter;

    fn rgb(width: usize, height: usize, value: u8) -> Vec<u8> {
        vec![value; width * height * 3]
    }

    #[test]
    fn test_load_from_buffer() {
        let image = Image::load_from_buffer(&rgb(4, 2, 17), 4, 2).unwrap();
        assert_eq!((image.width(), image.height(), image.channels()), (4, 2, 3));
        assert!(image.current().as_slice().iter().all(|&v| v == 17.0));
        assert_eq!(image.current(), image.original());
    }

    #[test]
    fn test_load_rejects_short_buffer() {
        assert_eq!(
            Image::load_from_buffer(&rgb(4, 1, 0), 4, 2).unwrap_err(),
            ImagingError::BufferLength {
                expected: 24,
                actual: 12
            }
        );
        assert!(Image::load_from_buffer(&[], 0, 2).is_err());
    }

    #[test]
    fn test_save_and_restore() {
        let mut image = Image::load_from_buffer(&rgb(3, 3, 40), 3, 3).unwrap();
        image.negate();
        assert_eq!(image.current().sample(0, 0, 0).unwrap(), 215.0);
        assert_eq!(image.original().sample(0, 0, 0).unwrap(), 40.0);

        image.restore_original();
        assert_eq!(image.current().sample(0, 0, 0).unwrap(), 40.0);

        image.negate();
        image.save_original();
        image.enhance(1.0, 5.0).unwrap();
        image.restore_original();
        assert_eq!(image.current().sample(0, 0, 0).unwrap(), 215.0);
    }

    #[test]
    fn test_restore_after_grayscale() {
        let mut image = Image::new(2, 2, 3).unwrap();
        image.to_grayscale(GrayscaleMethod::Rec709).unwrap();
        assert_eq!(image.channels(), 1);
        image.restore_original();
        assert_eq!(image.channels(), 3);
    }

    #[test]
    fn test_apply_filter_and_spec() {
        let mut image = Image::load_from_buffer(&rgb(5, 5, 90), 5, 5).unwrap();
        image.apply_filter(&MeanFilter::new(1).unwrap()).unwrap();
        assert_eq!(image.current(), image.original());

        let registry = FilterRegistry::with_builtins();
        image
            .apply_spec(&registry, &FilterSpec::new("median").with("kernel_size", 5i64))
            .unwrap();
        assert!(image.current().as_slice().iter().all(|&v| v == 90.0));
        assert!(image.apply_spec(&registry, &FilterSpec::new("sharpen")).is_err());
    }

    #[test]
    fn test_map_samples_clamps() {
        let mut image = Image::load_from_buffer(&rgb(2, 2, 200), 2, 2).unwrap();
        image.map_samples(|v| v * 2.0);
        assert!(image.current().as_slice().iter().all(|&v| v == 255.0));
        assert_eq!(image.histogram().counts()[255], 4);
    }
}
