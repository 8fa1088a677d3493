//! Flat pixel buffer with bounds-checked sample access.
//!
//! Samples are `f64` stored row-major with interleaved channels, so the
//! sample `(y, x, c)` lives at `(y * width + x) * channels + c`. Every public
//! write clamps to `[0, 255]`.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::parallel::for_each_row;

/// Lowest representable sample value.
pub const SAMPLE_MIN: f64 = 0.0;

/// Highest representable sample value.
pub const SAMPLE_MAX: f64 = 255.0;

/// Clamp a sample into `[0, 255]`. NaN maps to 0.
#[inline]
pub fn clamp_sample(value: f64) -> f64 {
    if value.is_nan() {
        SAMPLE_MIN
    } else {
        value.clamp(SAMPLE_MIN, SAMPLE_MAX)
    }
}

/// Convert a sample to a byte, rounding half up.
#[inline]
pub fn to_u8(value: f64) -> u8 {
    if value.is_nan() || value < SAMPLE_MIN {
        0
    } else if value > SAMPLE_MAX {
        255
    } else {
        (value + 0.5) as u8
    }
}

/// A rectangular array of floating point samples.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f64>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer.
    pub fn new(width: usize, height: usize, channels: usize) -> ImagingResult<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(ImagingError::InvalidDimension {
                width: width as i64,
                height: height as i64,
                channels: channels as i64,
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        })
    }

    /// Create a 3-channel buffer from row-major interleaved RGB bytes.
    pub fn from_interleaved_bytes(
        width: usize,
        height: usize,
        bytes: &[u8],
    ) -> ImagingResult<Self> {
        let mut buffer = Self::new(width, height, 3)?;
        let expected = width * height * 3;
        if bytes.len() != expected {
            return Err(ImagingError::BufferLength {
                expected,
                actual: bytes.len(),
            });
        }
        for (dst, &src) in buffer.data.iter_mut().zip(bytes) {
            *dst = f64::from(src);
        }
        Ok(buffer)
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(width, height, channels)`.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Whether the buffer holds a single channel.
    pub fn is_grayscale(&self) -> bool {
        self.channels == 1
    }

    /// All samples in layout order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Read a sample.
    pub fn sample(&self, y: usize, x: usize, c: usize) -> ImagingResult<f64> {
        self.check_bounds(y, x, c)?;
        Ok(self.data[self.index(y, x, c)])
    }

    /// Write a sample, clamped to `[0, 255]`.
    pub fn set_sample(&mut self, y: usize, x: usize, c: usize, value: f64) -> ImagingResult<()> {
        self.check_bounds(y, x, c)?;
        let index = self.index(y, x, c);
        self.data[index] = clamp_sample(value);
        Ok(())
    }

    /// Collapse a 3-channel buffer holding R=G=B into one channel.
    ///
    /// The red channel is kept.
    pub fn reduce_to_single_channel(&mut self) -> ImagingResult<()> {
        if self.channels != 3 {
            return Err(ImagingError::PreconditionViolated(format!(
                "channel reduction requires 3 channels, buffer has {}",
                self.channels
            )));
        }
        self.data = self.data.chunks_exact(3).map(|px| px[0]).collect();
        self.channels = 1;
        Ok(())
    }

    /// Export as interleaved bytes, rounding each sample.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().map(|&v| to_u8(v)).collect()
    }

    /// Apply `f` to every sample, clamping the result.
    pub fn map_samples<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for v in &mut self.data {
            *v = clamp_sample(f(*v));
        }
    }

    /// Overwrite every sample with `value`, clamped.
    pub fn fill(&mut self, value: f64) {
        let value = clamp_sample(value);
        self.data.iter_mut().for_each(|v| *v = value);
    }

    /// Unchecked read used by the filter loops, which only pass in-bounds coordinates.
    #[inline]
    pub(crate) fn at(&self, y: usize, x: usize, c: usize) -> f64 {
        self.data[self.index(y, x, c)]
    }

    /// Translate `(y, x)` by `(dy, dx)`, returning `None` off the buffer.
    #[inline]
    pub(crate) fn offset(
        &self,
        y: usize,
        x: usize,
        dy: isize,
        dx: isize,
    ) -> Option<(usize, usize)> {
        let ny = y.checked_add_signed(dy)?;
        let nx = x.checked_add_signed(dx)?;
        if ny < self.height && nx < self.width {
            Some((ny, nx))
        } else {
            None
        }
    }

    /// Recompute every sample from its `(y, x, c)` position.
    ///
    /// `f` must not depend on this buffer's contents; neighbourhood filters
    /// read from a snapshot taken before the call.
    pub(crate) fn fill_with<F>(&mut self, f: F)
    where
        F: Fn(usize, usize, usize) -> f64 + Send + Sync,
    {
        let channels = self.channels;
        let row_len = self.width * channels;
        for_each_row(&mut self.data, row_len, |y, row| {
            for (i, v) in row.iter_mut().enumerate() {
                *v = f(y, i / channels, i % channels);
            }
        });
    }

    /// Replace the contents with raw samples of the same layout.
    pub(crate) fn replace_data(&mut self, data: Vec<f64>) {
        debug_assert_eq!(data.len(), self.data.len());
        self.data = data;
    }

    #[inline]
    fn index(&self, y: usize, x: usize, c: usize) -> usize {
        (y * self.width + x) * self.channels + c
    }

    fn check_bounds(&self, y: usize, x: usize, c: usize) -> ImagingResult<()> {
        if y >= self.height || x >= self.width || c >= self.channels {
            return Err(ImagingError::OutOfRange {
                x: x as i64,
                y: y as i64,
                channel: c,
                width: self.width,
                height: self.height,
                channels: self.channels,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let buffer = PixelBuffer::new(4, 3, 3).unwrap();
        assert_eq!(buffer.dimensions(), (4, 3, 3));
        assert_eq!(buffer.as_slice().len(), 36);
        assert!(buffer.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 3, 1),
            Err(ImagingError::InvalidDimension { width: 0, .. })
        ));
        assert!(PixelBuffer::new(3, 0, 1).is_err());
        assert!(PixelBuffer::new(3, 3, 0).is_err());
    }

    #[test]
    fn test_layout_is_row_major_interleaved() {
        let bytes: Vec<u8> = (0..12).collect();
        let buffer = PixelBuffer::from_interleaved_bytes(2, 2, &bytes).unwrap();
        // pixel (y=1, x=0) starts at byte 6
        assert_eq!(buffer.sample(1, 0, 0).unwrap(), 6.0);
        assert_eq!(buffer.sample(1, 1, 2).unwrap(), 11.0);
    }

    #[test]
    fn test_byte_length_mismatch() {
        let err = PixelBuffer::from_interleaved_bytes(2, 2, &[0; 11]).unwrap_err();
        assert_eq!(err, ImagingError::BufferLength { expected: 12, actual: 11 });
    }

    #[test]
    fn test_out_of_range_access() {
        let mut buffer = PixelBuffer::new(2, 2, 1).unwrap();
        assert!(matches!(
            buffer.sample(0, 2, 0),
            Err(ImagingError::OutOfRange { x: 2, y: 0, .. })
        ));
        assert!(buffer.sample(0, 0, 1).is_err());
        assert!(buffer.set_sample(2, 0, 0, 1.0).is_err());
    }

    #[test]
    fn test_set_sample_clamps() {
        let mut buffer = PixelBuffer::new(1, 1, 1).unwrap();
        buffer.set_sample(0, 0, 0, 300.0).unwrap();
        assert_eq!(buffer.sample(0, 0, 0).unwrap(), 255.0);
        buffer.set_sample(0, 0, 0, -4.0).unwrap();
        assert_eq!(buffer.sample(0, 0, 0).unwrap(), 0.0);
        buffer.set_sample(0, 0, 0, f64::NAN).unwrap();
        assert_eq!(buffer.sample(0, 0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut buffer = PixelBuffer::new(2, 2, 1).unwrap();
        let copy = buffer.clone();
        buffer.set_sample(0, 0, 0, 9.0).unwrap();
        assert_eq!(copy.sample(0, 0, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_reduce_to_single_channel() {
        let bytes = [10, 10, 10, 20, 20, 20];
        let mut buffer = PixelBuffer::from_interleaved_bytes(2, 1, &bytes).unwrap();
        buffer.reduce_to_single_channel().unwrap();
        assert_eq!(buffer.channels(), 1);
        assert_eq!(buffer.as_slice(), &[10.0, 20.0]);

        assert!(matches!(
            buffer.reduce_to_single_channel(),
            Err(ImagingError::PreconditionViolated(_))
        ));
    }

    #[test]
    fn test_to_u8_rounds_half_up() {
        assert_eq!(to_u8(127.3), 127);
        assert_eq!(to_u8(127.5), 128);
        assert_eq!(to_u8(-5.0), 0);
        assert_eq!(to_u8(300.0), 255);
    }

    #[test]
    fn test_offset_skips_outside() {
        let buffer = PixelBuffer::new(3, 3, 1).unwrap();
        assert_eq!(buffer.offset(0, 0, -1, 0), None);
        assert_eq!(buffer.offset(2, 2, 0, 1), None);
        assert_eq!(buffer.offset(1, 1, 1, -1), Some((2, 0)));
    }
}
