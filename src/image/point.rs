//! Point operators: each output sample depends only on the same pixel.

use crate::core::buffer::{to_u8, PixelBuffer, SAMPLE_MAX};
use crate::core::color::{pixel_gray, GrayscaleMethod};
use crate::core::error::{ImagingError, ImagingResult};
use crate::image::histogram::Histogram;

/// Smallest accepted quantisation level count.
pub const MIN_LEVELS: i64 = 2;

/// Largest accepted quantisation level count.
pub const MAX_LEVELS: i64 = 256;

/// `v <- 255 - v` on every sample.
pub fn negate(buffer: &mut PixelBuffer) {
    buffer.map_samples(|v| SAMPLE_MAX - v);
}

/// Threshold Rec. 601 luminance: 255 where it exceeds `threshold`, else 0.
pub fn binarize(buffer: &mut PixelBuffer, threshold: f64) {
    replace_with_gray(buffer, GrayscaleMethod::Rec601, |gray| {
        if gray > threshold {
            SAMPLE_MAX
        } else {
            0.0
        }
    });
}

/// Uniform quantisation to `levels` buckets, each sample mapped to its bucket midpoint.
pub fn quantize(buffer: &mut PixelBuffer, levels: i64) -> ImagingResult<()> {
    if !(MIN_LEVELS..=MAX_LEVELS).contains(&levels) {
        return Err(ImagingError::invalid_parameter(
            "levels",
            levels,
            format!("must be between {} and {}", MIN_LEVELS, MAX_LEVELS),
        ));
    }
    let step = 256.0 / levels as f64;
    let top = levels - 1;
    buffer.map_samples(|v| {
        let index = ((v / step) as i64).clamp(0, top);
        index as f64 * step + step / 2.0
    });
    Ok(())
}

/// Affine contrast stretch `v <- alpha * v + beta`, clamped.
pub fn enhance(buffer: &mut PixelBuffer, alpha: f64, beta: f64) -> ImagingResult<()> {
    if !alpha.is_finite() {
        return Err(ImagingError::invalid_parameter("alpha", alpha, "must be finite"));
    }
    if !beta.is_finite() {
        return Err(ImagingError::invalid_parameter("beta", beta, "must be finite"));
    }
    buffer.map_samples(|v| alpha * v + beta);
    Ok(())
}

/// Histogram equalisation of luminance, replicated to every channel.
pub fn equalize_histogram(buffer: &mut PixelBuffer) {
    let lut = Histogram::of_luminance(buffer).equalization_lut();
    replace_with_gray(buffer, GrayscaleMethod::Rec601, |gray| {
        f64::from(lut[usize::from(to_u8(gray))])
    });
}

/// Write `method`'s gray value to every channel, then drop to one channel
/// if the buffer had exactly three.
pub fn to_grayscale(buffer: &mut PixelBuffer, method: GrayscaleMethod) -> ImagingResult<()> {
    if buffer.is_grayscale() {
        return Ok(());
    }
    replace_with_gray(buffer, method, |gray| gray);
    if buffer.channels() == 3 {
        buffer.reduce_to_single_channel()?;
    }
    Ok(())
}

/// Compute each pixel's gray value, then write `f(gray)` to all its channels.
fn replace_with_gray<F>(buffer: &mut PixelBuffer, method: GrayscaleMethod, f: F)
where
    F: Fn(f64) -> f64,
{
    let width = buffer.width();
    let gray: Vec<f64> = (0..buffer.height())
        .flat_map(|y| (0..width).map(move |x| (y, x)))
        .map(|(y, x)| f(pixel_gray(buffer, y, x, method)))
        .collect();
    buffer.fill_with(|y, x, _| gray[y * width + x]);
}
