//! # Imagerie - Raster Filtering and Morphology
//!
//! Imagerie is an in-memory image filtering engine. It owns a floating point
//! pixel buffer and applies point operators, linear and rank filters, edge
//! detectors and grey-level morphology to it.
//!
//! ## Features
//!
//! - **Pixel buffer**: flat, row-major, channel-interleaved samples kept in `[0, 255]`
//! - **Filters**: mean, Gaussian, bilateral, median, min/max, Sobel, Prewitt, Canny
//! - **Morphology**: erosion, dilation, opening and closing over any structuring element
//! - **Point operators**: negate, binarize, quantize, enhance, histogram equalisation
//! - **Registry**: every filter publishes metadata and can be built from a JSON request
//! - **Parallel**: neighbourhood loops run row-parallel on rayon (`parallel` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use imagerie::prelude::*;
//!
//! let bytes = vec![128u8; 8 * 8 * 3];
//! let mut image = Image::load_from_buffer(&bytes, 8, 8).unwrap();
//!
//! // Direct construction
//! image.apply_filter(&GaussianFilter::new(5, 1.0).unwrap()).unwrap();
//!
//! // Through the registry
//! let registry = FilterRegistry::with_builtins();
//! let spec = FilterSpec::new("erosion").with("element", "disk").with("radius", 1.5);
//! image.apply_spec(&registry, &spec).unwrap();
//!
//! image.quantize(4).unwrap();
//! image.restore_original();
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: buffer, structuring elements, the filter contract, parameters, errors
//! - [`filters`]: the filter registry and built-in filters
//! - [`image`]: the [`image::Image`] facade and point operators
//!
//! ## Writing a Filter
//!
//! Implement [`core::filter::Filter`]; linear filters can also implement
//! [`core::filter::ConvolutionFilter`] and call its `convolve` loop:
//!
//! ```rust
//! use imagerie::prelude::*;
//!
//! #[derive(Debug, Clone, Default)]
//! struct Darken;
//!
//! impl Filter for Darken {
//!     fn metadata(&self) -> FilterMetadata {
//!         FilterMetadata::builder("darken", "Darken")
//!             .category(Category::Smoothing)
//!             .build()
//!     }
//!
//!     fn name(&self) -> String {
//!         "Darken".to_string()
//!     }
//!
//!     fn apply(&self, buffer: &mut PixelBuffer) -> ImagingResult<()> {
//!         buffer.map_samples(|v| v * 0.5);
//!         Ok(())
//!     }
//!
//!     fn clone_box(&self) -> Box<dyn Filter> {
//!         Box::new(self.clone())
//!     }
//! }
//!
//! let mut registry = FilterRegistry::new();
//! registry.register(|_| Ok(Darken));
//! assert!(registry.create("darken").is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod filters;
pub mod image;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use imagerie::prelude::*;
/// ```
pub mod prelude {
    // Buffer and elements
    pub use crate::core::buffer::{clamp_sample, to_u8, PixelBuffer};
    pub use crate::core::color::GrayscaleMethod;
    pub use crate::core::element::StructuringElement;

    // Filter contract
    pub use crate::core::filter::{
        Category, ConvolutionFilter, Filter, FilterMetadata, KernelSize,
    };
    pub use crate::core::params::{Constraint, FilterParams, ParameterDefinition};
    pub use crate::core::types::{FilterSpec, ParamType, Value};

    // Errors
    pub use crate::core::error::{ImagingError, ImagingResult};

    // Filters
    pub use crate::filters::registry::{FilterFactory, FilterRegistry, RegistryEntry};
    pub use crate::filters::builtin::{
        // Smoothing
        BilateralFilter, GaussianFilter, MeanFilter,
        // Rank
        MaxFilter, MedianFilter, MinFilter,
        // Edge
        CannyFilter, PrewittFilter, SobelFilter,
        // Morphology
        Closing, Dilation, Erosion, Extremum, Opening,
    };

    // Facade
    pub use crate::image::{Histogram, Image};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
