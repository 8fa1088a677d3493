//! Order-statistic filters: Median, Min and Max.
//!
//! All three gather the in-bounds samples of a square window. Near the
//! border the window is smaller, and the median index follows the number of
//! samples actually gathered.

use crate::core::buffer::PixelBuffer;
use crate::core::error::ImagingResult;
use crate::core::filter::{Category, Filter, FilterMetadata, KernelSize};
use crate::filters::builtin::smoothing::kernel_size_parameter;
use crate::filters::registry::FilterRegistry;

/// Register rank filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|p| MedianFilter::new(p.integer("kernel_size")?));
    registry.register(|p| MinFilter::new(p.integer("kernel_size")?));
    registry.register(|p| MaxFilter::new(p.integer("kernel_size")?));
}

/// Select the `k`-th smallest value, reordering `values` in place.
///
/// Lomuto partition around the last element, narrowing to the side that
/// holds `k`. Panics if `k` is out of bounds.
pub fn quickselect(values: &mut [f64], k: usize) -> f64 {
    assert!(k < values.len(), "quickselect index {} out of {}", k, values.len());
    let mut left = 0;
    let mut right = values.len() - 1;

    while left < right {
        let pivot = values[right];
        let mut i = left;
        for j in left..right {
            if values[j] < pivot {
                values.swap(i, j);
                i += 1;
            }
        }
        values.swap(i, right);

        if i == k {
            break;
        } else if i > k {
            right = i - 1;
        } else {
            left = i + 1;
        }
    }

    values[k]
}

/// Run `reduce` over the in-bounds window of every sample.
fn rank_pass<F>(buffer: &mut PixelBuffer, kernel: KernelSize, reduce: F)
where
    F: Fn(&mut Vec<f64>) -> f64 + Send + Sync,
{
    let r = kernel.radius() as isize;
    let capacity = kernel.size() * kernel.size();
    let source = buffer.clone();
    buffer.fill_with(|y, x, c| {
        let mut window = Vec::with_capacity(capacity);
        for dy in -r..=r {
            for dx in -r..=r {
                if let Some((ny, nx)) = source.offset(y, x, dy, dx) {
                    window.push(source.at(ny, nx, c));
                }
            }
        }
        reduce(&mut window)
    });
}

/// Median filter backed by quickselect.
#[derive(Debug, Clone)]
pub struct MedianFilter {
    kernel: KernelSize,
}

impl MedianFilter {
    /// Create a median filter of the given odd size.
    pub fn new(kernel_size: i64) -> ImagingResult<Self> {
        Ok(Self {
            kernel: KernelSize::new(kernel_size)?,
        })
    }
}

impl Default for MedianFilter {
    fn default() -> Self {
        Self {
            kernel: KernelSize(3),
        }
    }
}

impl Filter for MedianFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("median", "Median Filter")
            .description("Replace every sample with the median of its window")
            .category(Category::Rank)
            .parameter(kernel_size_parameter(3))
            .tags(["denoise", "salt-and-pepper", "order statistic"])
            .build()
    }

    fn name(&self) -> String {
        "Median Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!(
            "median {}x{} on {}x{}x{}",
            self.kernel.size(),
            self.kernel.size(),
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );
        rank_pass(buffer, self.kernel, |window| {
            let mid = window.len() / 2;
            quickselect(window, mid)
        });
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

/// Local minimum over a square window.
#[derive(Debug, Clone)]
pub struct MinFilter {
    kernel: KernelSize,
}

impl MinFilter {
    /// Create a min filter of the given odd size.
    pub fn new(kernel_size: i64) -> ImagingResult<Self> {
        Ok(Self {
            kernel: KernelSize::new(kernel_size)?,
        })
    }
}

impl Default for MinFilter {
    fn default() -> Self {
        Self {
            kernel: KernelSize(3),
        }
    }
}

impl Filter for MinFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("min", "Min Filter")
            .description("Replace every sample with the smallest value in its window")
            .category(Category::Rank)
            .parameter(kernel_size_parameter(3))
            .tags(["minimum", "darken", "order statistic"])
            .build()
    }

    fn name(&self) -> String {
        "Min Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!(
            "min {}x{} on {}x{}",
            self.kernel.size(),
            self.kernel.size(),
            buffer.width(),
            buffer.height()
        );
        rank_pass(buffer, self.kernel, |window| {
            window.iter().fold(255.0, |acc: f64, &v| if v < acc { v } else { acc })
        });
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

/// Local maximum over a square window.
#[derive(Debug, Clone)]
pub struct MaxFilter {
    kernel: KernelSize,
}

impl MaxFilter {
    /// Create a max filter of the given odd size.
    pub fn new(kernel_size: i64) -> ImagingResult<Self> {
        Ok(Self {
            kernel: KernelSize::new(kernel_size)?,
        })
    }
}

impl Default for MaxFilter {
    fn default() -> Self {
        Self {
            kernel: KernelSize(3),
        }
    }
}

impl Filter for MaxFilter {
    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder("max", "Max Filter")
            .description("Replace every sample with the largest value in its window")
            .category(Category::Rank)
            .parameter(kernel_size_parameter(3))
            .tags(["maximum", "lighten", "order statistic"])
            .build()
    }

    fn name(&self) -> String {
        "Max Filter".to_string()
    }

    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
        log::debug!(
            "max {}x{} on {}x{}",
            self.kernel.size(),
            self.kernel.size(),
            buffer.width(),
            buffer.height()
        );
        rank_pass(buffer, self.kernel, |window| {
            window.iter().fold(0.0, |acc: f64, &v| if v > acc { v } else { acc })
        });
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}
