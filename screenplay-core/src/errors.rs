//! Typed failures surfaced by the core.
//!
//! Plumbing (I/O, YAML, JSON) goes through `anyhow`; the enums here are the
//! failures a caller is expected to match on.

use crate::types::ElementType;
use thiserror::Error;

/// Errors raised while laying elements onto pages
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaginationError {
    /// The measurement collaborator could not produce a height
    #[error("no height measurement available for element {index} ({element_type})")]
    MeasurementUnavailable {
        index: usize,
        element_type: ElementType,
    },

    /// A height was produced but it cannot be laid out (NaN, infinite or negative)
    #[error("invalid height {height} measured for element {index}")]
    InvalidMeasurement { index: usize, height: f32 },

    /// Heights and elements do not line up one-to-one
    #[error("expected {expected} height measurements, got {actual}")]
    MeasurementCountMismatch { expected: usize, actual: usize },
}

/// Errors raised while validating a formatter configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid page geometry: {0}")]
    InvalidPageGeometry(String),

    #[error("invalid classification threshold: {0}")]
    InvalidThreshold(String),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// An external label that names no element type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown element type label: '{0}'")]
pub struct ParseElementTypeError(pub String);
