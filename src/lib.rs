//! # Tempo DSP
//!
//! Reference-free tempo (BPM) estimation for decoded audio. Three independent
//! estimators analyse the same buffer and every result carries a confidence
//! score derived from how close it sits to a whole BPM and how well the
//! estimators agree.
//!
//! ## Features
//!
//! - **Autocorrelation**: periodicity of a mel-band onset-strength envelope
//! - **Spectral flux** (`"energy flux"`): median interval between spectral-flux peaks
//! - **Windowed energy flux** (`"web style"`): kernel density over beat-interval candidates
//! - **Confidence scoring**: integer proximity plus cross-algorithm agreement
//!
//! ## Quick Start
//!
//! ```no_run
//! use tempo_dsp::{detect_all, detect_bpm, Algorithm};
//!
//! // Decoded mono samples
//! let samples: Vec<f32> = vec![0.0; 44100 * 10];
//! let sample_rate = 44100;
//!
//! let results = detect_all(&samples, sample_rate)?;
//! for (algorithm, result) in results.iter() {
//!     println!("{}: {:.2} BPM (confidence {:.2})", algorithm, result.bpm, result.confidence);
//! }
//!
//! let bpm = detect_bpm(&samples, sample_rate, Algorithm::SpectralFlux)?;
//! # Ok::<(), tempo_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Samples → Downmix → Estimators (parallel) → Confidence scoring → ResultSet
//! ```
//!
//! A BPM of 0.0 means "no detection"; it is never an error. Errors are reserved
//! for invalid input (empty buffer, zero sample rate, bad tempo range) and
//! unknown algorithm names.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::detector::BpmDetector;
pub use analysis::result::{Algorithm, ConfidenceLevel, EstimationResult, ResultSet};
pub use config::{DetectorConfig, TempoRange};
pub use error::AnalysisError;
pub use io::sample_buffer::SampleBuffer;

/// Estimate the tempo of mono samples with one algorithm
///
/// Uses the default tempo range (92-184 BPM).
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `algorithm` - Estimator to run
///
/// # Returns
///
/// The BPM estimate, or 0.0 when the algorithm finds no tempo in range
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer or zero sample rate
///
/// # Example
///
/// ```no_run
/// use tempo_dsp::{detect_bpm, Algorithm};
///
/// let samples = vec![0.0f32; 44100 * 10];
/// let bpm = detect_bpm(&samples, 44100, Algorithm::Autocorrelation)?;
/// # Ok::<(), tempo_dsp::AnalysisError>(())
/// ```
pub fn detect_bpm(
    samples: &[f32],
    sample_rate: u32,
    algorithm: Algorithm,
) -> Result<f32, AnalysisError> {
    BpmDetector::default().detect(samples, sample_rate, algorithm)
}

/// Run every algorithm on mono samples with the default tempo range
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer or zero sample rate
pub fn detect_all(samples: &[f32], sample_rate: u32) -> Result<ResultSet, AnalysisError> {
    BpmDetector::default().detect_all(samples, sample_rate)
}
