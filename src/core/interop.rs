//! Conversions to and from already-decoded `image` crate buffers.

use crate::core::buffer::{to_u8, PixelBuffer};
use crate::core::error::{ImagingError, ImagingResult};
use image::{GrayImage, RgbImage};

impl PixelBuffer {
    /// Copy an 8-bit RGB image into a 3-channel buffer.
    pub fn from_rgb_image(image: &RgbImage) -> ImagingResult<Self> {
        let (width, height) = image.dimensions();
        Self::from_interleaved_bytes(width as usize, height as usize, image.as_raw())
    }

    /// Copy an 8-bit gray image into a 1-channel buffer.
    pub fn from_gray_image(image: &GrayImage) -> ImagingResult<Self> {
        let (width, height) = image.dimensions();
        let mut buffer = Self::new(width as usize, height as usize, 1)?;
        buffer.replace_data(image.as_raw().iter().map(|&v| f64::from(v)).collect());
        Ok(buffer)
    }

    /// Export as an 8-bit RGB image. Single-channel buffers are replicated.
    pub fn to_rgb_image(&self) -> ImagingResult<RgbImage> {
        let bytes = match self.channels() {
            3 => self.to_bytes(),
            1 => self
                .as_slice()
                .iter()
                .flat_map(|&v| std::iter::repeat(to_u8(v)).take(3))
                .collect(),
            n => {
                return Err(ImagingError::PreconditionViolated(format!(
                    "RGB export needs 1 or 3 channels, buffer has {}",
                    n
                )))
            }
        };
        self.image_from_raw(bytes)
    }

    /// Export a single-channel buffer as an 8-bit gray image.
    pub fn to_gray_image(&self) -> ImagingResult<GrayImage> {
        if self.channels() != 1 {
            return Err(ImagingError::PreconditionViolated(format!(
                "gray export needs 1 channel, buffer has {}",
                self.channels()
            )));
        }
        self.image_from_raw(self.to_bytes())
    }

    fn image_from_raw<P>(&self, bytes: Vec<u8>) -> ImagingResult<image::ImageBuffer<P, Vec<u8>>>
    where
        P: image::Pixel<Subpixel = u8>,
    {
        let expected = self.pixel_count() * usize::from(P::CHANNEL_COUNT);
        let actual = bytes.len();
        image::ImageBuffer::from_raw(self.width() as u32, self.height() as u32, bytes)
            .ok_or(ImagingError::BufferLength { expected, actual })
    }
}
