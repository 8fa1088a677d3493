//! Built-in filter implementations.
//!
//! This module contains the standard filters that ship with Imagerie.

mod edge;
mod morphology;
mod rank;
mod smoothing;

use crate::filters::registry::FilterRegistry;

/// Register all built-in filters.
pub fn register_all(registry: &mut FilterRegistry) {
    smoothing::register(registry);
    rank::register(registry);
    edge::register(registry);
    morphology::register(registry);
}

// Re-export for direct access
pub use edge::{CannyFilter, PrewittFilter, SobelFilter};
pub use morphology::{morphological_pass, Closing, Dilation, Erosion, Extremum, Opening};
pub use rank::{quickselect, MaxFilter, MedianFilter, MinFilter};
pub use smoothing::{BilateralFilter, GaussianFilter, MeanFilter};
