//! Error types for the tempo estimation engine

use std::fmt;

/// Errors that can occur during tempo estimation
///
/// "No tempo found" is not an error: estimators report it in-band as a BPM of 0.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters (empty buffer, zero sample rate, bad tempo range)
    InvalidInput(String),

    /// Algorithm identifier outside the known set
    UnknownAlgorithm(String),

    /// Processing error inside a single estimator
    ProcessingError(String),

    /// Numerical error (division by zero, non-finite values, etc.)
    NumericalError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::UnknownAlgorithm(name) => write!(f, "Unknown algorithm: {}", name),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
