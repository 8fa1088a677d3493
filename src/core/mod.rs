//! Core types and traits for the Imagerie filtering engine.
//!
//! This module contains the building blocks every operator is written against:
//! - the sample buffer and its 8-bit conversions
//! - structuring elements and grayscale methods
//! - the filter contract, its metadata and parameters
//! - error types

pub mod buffer;
pub mod color;
pub mod element;
pub mod error;
pub mod filter;
pub mod interop;
pub(crate) mod parallel;
pub mod params;
pub mod types;

// Re-export commonly used types
pub use buffer::{clamp_sample, to_u8, PixelBuffer};
pub use color::GrayscaleMethod;
pub use element::StructuringElement;
pub use error::{ImagingError, ImagingResult};
pub use filter::{Category, ConvolutionFilter, Filter, FilterMetadata, KernelSize};
pub use params::{Constraint, FilterParams, ParameterDefinition};
pub use types::{FilterSpec, ParamType, Value};
