//! Luminance histogram and the equalisation lookup table derived from it.

use crate::core::buffer::{to_u8, PixelBuffer};
use crate::core::color::{pixel_gray, GrayscaleMethod};

/// Number of bins, one per 8-bit level.
pub const BINS: usize = 256;

/// 256-bin histogram of Rec. 601 luminance, rounded to 8 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; BINS],
    total: u64,
}

impl Histogram {
    /// Count the luminance of every pixel.
    pub fn of_luminance(buffer: &PixelBuffer) -> Self {
        let mut counts = [0u64; BINS];
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let level = to_u8(pixel_gray(buffer, y, x, GrayscaleMethod::Rec601));
                counts[usize::from(level)] += 1;
            }
        }
        let total = counts.iter().sum();
        Self { counts, total }
    }

    /// Per-level counts.
    pub fn counts(&self) -> &[u64; BINS] {
        &self.counts
    }

    /// Number of pixels counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Cumulative distribution, `cdf[i] = counts[0] + ... + counts[i]`.
    pub fn cdf(&self) -> [u64; BINS] {
        let mut cdf = [0u64; BINS];
        let mut acc = 0u64;
        for (slot, &count) in cdf.iter_mut().zip(self.counts.iter()) {
            acc += count;
            *slot = acc;
        }
        cdf
    }

    /// First non-zero value of the cumulative distribution.
    pub fn cdf_min(&self) -> u64 {
        self.cdf().into_iter().find(|&v| v != 0).unwrap_or(0)
    }

    /// Lookup table mapping each level to its equalised level.
    ///
    /// Levels at or below the first occupied one map to 0; the rest are
    /// rescaled by `(cdf - cdf_min) * 255 / (total - cdf_min)`.
    pub fn equalization_lut(&self) -> [u8; BINS] {
        let cdf = self.cdf();
        let cdf_min = self.cdf_min();
        let denom = if self.total > cdf_min {
            self.total - cdf_min
        } else {
            1
        };

        let mut lut = [0u8; BINS];
        for (entry, &c) in lut.iter_mut().zip(cdf.iter()) {
            if c > cdf_min {
                *entry = to_u8((c - cdf_min) as f64 * 255.0 / denom as f64);
            }
        }
        lut
    }
}
