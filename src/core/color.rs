//! Grayscale conversion methods.

use crate::core::buffer::PixelBuffer;
use serde::{Deserialize, Serialize};

/// ITU-R BT.601 luminosity coefficients.
const REC601: [f64; 3] = [0.299, 0.587, 0.114];

/// ITU-R BT.709 luminosity coefficients.
const REC709: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// How to collapse an RGB triple into a single gray value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrayscaleMethod {
    /// ITU-R BT.601 (SDTV) luma.
    #[default]
    Rec601,
    /// ITU-R BT.709 (HDTV) luma.
    Rec709,
    /// Arithmetic mean of R, G and B.
    Average,
    /// HSL lightness, `(max + min) / 2`.
    Lightness,
    /// Largest of R, G and B.
    Maximum,
    /// Smallest of R, G and B.
    Minimum,
    /// Red channel only.
    Red,
    /// Green channel only.
    Green,
    /// Blue channel only.
    Blue,
}

impl GrayscaleMethod {
    /// Convert one RGB triple.
    pub fn convert(self, r: f64, g: f64, b: f64) -> f64 {
        match self {
            GrayscaleMethod::Rec601 => weighted(REC601, r, g, b),
            GrayscaleMethod::Rec709 => weighted(REC709, r, g, b),
            GrayscaleMethod::Average => (r + g + b) / 3.0,
            GrayscaleMethod::Lightness => (r.max(g).max(b) + r.min(g).min(b)) / 2.0,
            GrayscaleMethod::Maximum => r.max(g).max(b),
            GrayscaleMethod::Minimum => r.min(g).min(b),
            GrayscaleMethod::Red => r,
            GrayscaleMethod::Green => g,
            GrayscaleMethod::Blue => b,
        }
    }

    /// Display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            GrayscaleMethod::Rec601 => "Rec. 601 (SDTV)",
            GrayscaleMethod::Rec709 => "Rec. 709 (HDTV)",
            GrayscaleMethod::Average => "Average",
            GrayscaleMethod::Lightness => "Lightness (HSL)",
            GrayscaleMethod::Maximum => "Max RGB",
            GrayscaleMethod::Minimum => "Min RGB",
            GrayscaleMethod::Red => "Red channel",
            GrayscaleMethod::Green => "Green channel",
            GrayscaleMethod::Blue => "Blue channel",
        }
    }

    /// Get all methods in display order.
    pub fn all() -> &'static [GrayscaleMethod] {
        &[
            GrayscaleMethod::Rec601,
            GrayscaleMethod::Rec709,
            GrayscaleMethod::Average,
            GrayscaleMethod::Lightness,
            GrayscaleMethod::Maximum,
            GrayscaleMethod::Minimum,
            GrayscaleMethod::Red,
            GrayscaleMethod::Green,
            GrayscaleMethod::Blue,
        ]
    }
}

#[inline]
fn weighted(k: [f64; 3], r: f64, g: f64, b: f64) -> f64 {
    k[0] * r + k[1] * g + k[2] * b
}

/// Gray value of pixel `(y, x)` under `method`.
///
/// Single-channel buffers return the sample itself. Missing G or B channels
/// fall back to R.
pub(crate) fn pixel_gray(buffer: &PixelBuffer, y: usize, x: usize, method: GrayscaleMethod) -> f64 {
    let channels = buffer.channels();
    let r = buffer.at(y, x, 0);
    if channels == 1 {
        return r;
    }
    let g = if channels > 1 { buffer.at(y, x, 1) } else { r };
    let b = if channels > 2 { buffer.at(y, x, 2) } else { r };
    method.convert(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rec601_weights() {
        let gray = GrayscaleMethod::Rec601.convert(255.0, 0.0, 0.0);
        assert!((gray - 76.245).abs() < 1e-9);
    }

    #[test]
    fn test_lightness_and_extrema() {
        assert_eq!(GrayscaleMethod::Lightness.convert(10.0, 50.0, 30.0), 30.0);
        assert_eq!(GrayscaleMethod::Maximum.convert(10.0, 50.0, 30.0), 50.0);
        assert_eq!(GrayscaleMethod::Minimum.convert(10.0, 50.0, 30.0), 10.0);
        assert_eq!(GrayscaleMethod::Blue.convert(10.0, 50.0, 30.0), 30.0);
    }

    #[test]
    fn test_single_channel_gray_is_direct() {
        let mut buffer = PixelBuffer::new(1, 1, 1).unwrap();
        buffer.set_sample(0, 0, 0, 77.0).unwrap();
        assert_eq!(pixel_gray(&buffer, 0, 0, GrayscaleMethod::Rec709), 77.0);
    }

    #[test]
    fn test_method_serde_names() {
        let json = serde_json::to_string(&GrayscaleMethod::Rec709).unwrap();
        assert_eq!(json, "\"rec709\"");
        assert_eq!(GrayscaleMethod::all().len(), 9);
    }
}
