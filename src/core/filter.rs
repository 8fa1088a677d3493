//! Filter trait, filter metadata and the convolution base.
//!
//! Every neighbourhood operator implements [`Filter`]: a parameter-only value
//! that transforms a [`PixelBuffer`] in place. Linear filters additionally
//! implement [`ConvolutionFilter`], which supplies the windowed sum loop.

use crate::core::buffer::{clamp_sample, PixelBuffer};
use crate::core::element::MAX_RADIUS;
use crate::core::error::{ImagingError, ImagingResult};
use crate::core::params::ParameterDefinition;
use serde::{Deserialize, Serialize};

/// Category for organizing filters in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Linear and edge-preserving smoothing
    Smoothing,
    /// Order-statistic filters
    Rank,
    /// Gradient and edge detection
    Edge,
    /// Lattice morphology
    Morphology,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Smoothing => "Smoothing",
            Category::Rank => "Rank",
            Category::Edge => "Edge",
            Category::Morphology => "Morphology",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Smoothing,
            Category::Rank,
            Category::Edge,
            Category::Morphology,
        ]
    }
}

/// Metadata describing a filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterMetadata {
    /// Unique identifier for this filter type (e.g., "gaussian")
    pub id: String,
    /// Human-readable name (e.g., "Gaussian Filter")
    pub name: String,
    /// Category for catalog organization
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Parameter definitions
    pub parameters: Vec<ParameterDefinition>,
    /// Searchable tags
    pub tags: Vec<String>,
}

impl FilterMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> FilterMetadataBuilder {
        FilterMetadataBuilder::new(id, name)
    }

    /// Get all parameter names.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Find a parameter by name.
    pub fn get_parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Builder for FilterMetadata.
pub struct FilterMetadataBuilder {
    id: String,
    name: String,
    category: Category,
    description: String,
    parameters: Vec<ParameterDefinition>,
    tags: Vec<String>,
}

impl FilterMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Category::Smoothing,
            description: String::new(),
            parameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Build the metadata.
    pub fn build(self) -> FilterMetadata {
        FilterMetadata {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            parameters: self.parameters,
            tags: self.tags,
        }
    }
}

/// The core trait for image filters.
///
/// A filter carries only its parameters. `apply` validates any
/// buffer-dependent precondition before touching a sample, so a failed call
/// leaves the buffer as it was.
///
/// # Example Implementation
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// struct Invert;
///
/// impl Filter for Invert {
///     fn metadata(&self) -> FilterMetadata {
///         FilterMetadata::builder("invert", "Invert").build()
///     }
///
///     fn name(&self) -> String {
///         "Invert".to_string()
///     }
///
///     fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
///         buffer.map_samples(|v| 255.0 - v);
///         Ok(())
///     }
///
///     fn clone_box(&self) -> Box<dyn Filter> {
///         Box::new(self.clone())
///     }
/// }
/// ```
pub trait Filter: Send + Sync + std::fmt::Debug {
    /// Get the metadata for this filter type.
    fn metadata(&self) -> FilterMetadata;

    /// Human-readable name of this configured instance.
    fn name(&self) -> String;

    /// Transform `buffer` in place.
    fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()>;

    /// Clone this filter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Filter>;
}

impl Clone for Box<dyn Filter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Largest accepted window side length.
pub const MAX_KERNEL_SIZE: i64 = 2 * MAX_RADIUS as i64 + 1;

/// An odd, positive window side length, at most [`MAX_KERNEL_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64")]
pub struct KernelSize(pub(crate) usize);

impl KernelSize {
    /// Validate a kernel size.
    pub fn new(size: i64) -> ImagingResult<Self> {
        if size < 1 || size % 2 == 0 || size > MAX_KERNEL_SIZE {
            return Err(ImagingError::InvalidKernelSize(size));
        }
        Ok(Self(size as usize))
    }

    /// Side length.
    pub fn size(self) -> usize {
        self.0
    }

    /// Half-width, `size / 2`.
    pub fn radius(self) -> usize {
        self.0 / 2
    }
}

impl TryFrom<i64> for KernelSize {
    type Error = ImagingError;

    fn try_from(size: i64) -> ImagingResult<Self> {
        Self::new(size)
    }
}

/// A linear filter defined by a weight per window offset.
///
/// Out-of-range taps are skipped, not zero-padded, and the weighted sum is
/// clamped to `[0, 255]` before being written.
pub trait ConvolutionFilter: Filter {
    /// The window size.
    fn kernel_size(&self) -> KernelSize;

    /// Weight of the tap at `(dy, dx)`, both in `[-radius, radius]`.
    fn weight(&self, dy: isize, dx: isize) -> f64;

    /// Convolve `buffer` with this filter's kernel.
    fn convolve(&self, buffer: &mut PixelBuffer) {
        let r = self.kernel_size().radius() as isize;
        let source = buffer.clone();
        buffer.fill_with(|y, x, c| {
            let mut sum = 0.0;
            for dy in -r..=r {
                for dx in -r..=r {
                    if let Some((ny, nx)) = source.offset(y, x, dy, dx) {
                        sum += self.weight(dy, dx) * source.at(ny, nx, c);
                    }
                }
            }
            clamp_sample(sum)
        });
    }
}
