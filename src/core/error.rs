//! Error types for Imagerie.
//!
//! Uses thiserror for structured errors with context. Every error is raised
//! before any pixel is written and carries the offending values.

use thiserror::Error;

/// Top-level error type for every fallible operation in the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImagingError {
    /// Width, height or channel count was zero or negative.
    #[error("Invalid dimensions {width}x{height} with {channels} channel(s)")]
    InvalidDimension {
        /// Requested width.
        width: i64,
        /// Requested height.
        height: i64,
        /// Requested channel count.
        channels: i64,
    },

    /// Kernel size was non-positive, even or larger than the window limit.
    #[error(
        "Invalid kernel size {0}: must be odd and between 1 and {max}",
        max = crate::core::filter::MAX_KERNEL_SIZE
    )]
    InvalidKernelSize(i64),

    /// A numeric parameter fell outside its domain.
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Offending value, rendered.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Canny thresholds violate `0 <= low < high <= 255`.
    #[error("Invalid thresholds low={low}, high={high}: require 0 <= low < high <= 255")]
    InvalidThreshold {
        /// Low hysteresis threshold.
        low: f64,
        /// High hysteresis threshold.
        high: f64,
    },

    /// Sample access outside the buffer.
    #[error("Sample ({x}, {y}, channel {channel}) is outside a {width}x{height}x{channels} buffer")]
    OutOfRange {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Requested channel.
        channel: usize,
        /// Buffer width.
        width: usize,
        /// Buffer height.
        height: usize,
        /// Buffer channel count.
        channels: usize,
    },

    /// The buffer is smaller than the filter's window.
    #[error("Image {width}x{height} is too small: need at least {min_width}x{min_height}")]
    ImageTooSmall {
        /// Buffer width.
        width: usize,
        /// Buffer height.
        height: usize,
        /// Smallest accepted width.
        min_width: usize,
        /// Smallest accepted height.
        min_height: usize,
    },

    /// An operation was called on a buffer in the wrong state.
    #[error("Precondition violated: {0}")]
    PreconditionViolated(String),

    /// Raw byte input does not match the declared dimensions.
    #[error("Buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength {
        /// Bytes required by the dimensions.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// No filter is registered under this id.
    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    /// A filter request could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ImagingError {
    fn from(err: serde_json::Error) -> Self {
        ImagingError::Serialization(err.to_string())
    }
}

// ============================================================================
// Error Utilities
// ============================================================================

impl ImagingError {
    /// Build an `InvalidParameter` error.
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ImagingError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by a caller-supplied parameter
    /// rather than by the state of a buffer.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            ImagingError::InvalidKernelSize(_)
                | ImagingError::InvalidParameter { .. }
                | ImagingError::InvalidThreshold { .. }
                | ImagingError::UnknownFilter(_)
        )
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            ImagingError::InvalidKernelSize(size) => {
                let max = crate::core::filter::MAX_KERNEL_SIZE;
                let next = if *size < 1 {
                    1
                } else if *size > max {
                    max
                } else {
                    size + 1
                };
                Some(format!("Use an odd kernel size such as {}", next))
            }
            ImagingError::InvalidThreshold { .. } => {
                Some("Pick thresholds with 0 <= low < high <= 255".to_string())
            }
            ImagingError::InvalidParameter { name, reason, .. } => {
                Some(format!("Adjust '{}': {}", name, reason))
            }
            ImagingError::ImageTooSmall {
                min_width,
                min_height,
                ..
            } => Some(format!(
                "Use an image of at least {}x{} pixels",
                min_width, min_height
            )),
            ImagingError::PreconditionViolated(_) => {
                Some("Convert the image to 3 channels with R=G=B first".to_string())
            }
            ImagingError::BufferLength { expected, .. } => {
                Some(format!("Supply exactly {} bytes (3 per pixel)", expected))
            }
            _ => None,
        }
    }
}

/// Result type alias for Imagerie operations.
pub type ImagingResult<T> = Result<T, ImagingError>;
