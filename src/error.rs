//! Error types for astroglia

use thiserror::Error;

/// Astroglia error type
#[derive(Debug, Error)]
pub enum AstroError {
    /// Physiological target written outside its documented range
    #[error("Invalid {field}: {value} is outside [{min}, {max}]")]
    Validation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Connection mask or weight matrix has the wrong dimensions
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Calibration table absent or malformed
    #[error("Missing resource: {0}")]
    MissingResource(String),

    /// Probe identifier outside the probe vocabulary
    #[error("Invalid probe selector: {0}")]
    InvalidSelector(i64),

    /// Target written after the pipeline was realized into a substrate
    #[error("Astrocyte is sealed: targets cannot change after realization")]
    Sealed,

    /// Failure reported by the host substrate
    #[error("Substrate error: {0}")]
    Substrate(String),

    /// Malformed configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AstroError>;
