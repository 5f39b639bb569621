//! Multi-algorithm tempo detector
//!
//! Runs the estimators over one buffer (or many), isolates per-algorithm
//! failures and scores the results against each other.
//!
//! # Example
//!
//! ```no_run
//! use tempo_dsp::analysis::detector::BpmDetector;
//! use tempo_dsp::config::DetectorConfig;
//!
//! let samples = vec![0.0f32; 44100 * 10];
//! let detector = BpmDetector::new(DetectorConfig::default());
//! let results = detector.detect_all(&samples, 44100)?;
//!
//! for (algorithm, result) in results.iter() {
//!     println!("{}: {:.2} BPM ({:.2})", algorithm, result.bpm, result.confidence);
//! }
//! # Ok::<(), tempo_dsp::AnalysisError>(())
//! ```

use super::confidence::score_confidences;
use super::result::{Algorithm, ResultSet};
use crate::config::{DetectorConfig, TempoRange};
use crate::error::AnalysisError;
use crate::features::period::autocorrelation::estimate_bpm_autocorrelation;
use crate::features::period::density::estimate_bpm_density;
use crate::features::period::intervals::estimate_bpm_median_interval;
use crate::io::sample_buffer::SampleBuffer;
use rayon::prelude::*;

/// Tempo detector configured with a tempo range
#[derive(Debug, Clone, Default)]
pub struct BpmDetector {
    config: DetectorConfig,
}

impl BpmDetector {
    /// Create a detector
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Create a detector for `[min_bpm, max_bpm]`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` unless `0 < min_bpm < max_bpm`
    pub fn with_range(min_bpm: f32, max_bpm: f32) -> Result<Self, AnalysisError> {
        let range = TempoRange::new(min_bpm, max_bpm)?;
        Ok(Self::new(DetectorConfig::with_range(range)))
    }

    /// Detector configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run a single algorithm on a mono buffer
    ///
    /// # Returns
    ///
    /// The BPM estimate; 0.0 means no detection (including a failure inside the
    /// estimator, which is logged)
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for an empty buffer or zero sample rate
    pub fn detect(
        &self,
        samples: &[f32],
        sample_rate: u32,
        algorithm: Algorithm,
    ) -> Result<f32, AnalysisError> {
        validate_input(samples, sample_rate)?;
        Ok(self.run_isolated(samples, sample_rate, algorithm))
    }

    /// Run the algorithm named `name` ("autocorrelation", "energy flux", "web style")
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::UnknownAlgorithm` for any other name, before any
    /// processing happens, and the errors of [`BpmDetector::detect`]
    pub fn detect_named(
        &self,
        samples: &[f32],
        sample_rate: u32,
        name: &str,
    ) -> Result<f32, AnalysisError> {
        let algorithm: Algorithm = name.parse()?;
        self.detect(samples, sample_rate, algorithm)
    }

    /// Run every algorithm on a mono buffer and score the results
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for an empty buffer or zero sample
    /// rate; no partial results are produced in that case
    pub fn detect_all(&self, samples: &[f32], sample_rate: u32) -> Result<ResultSet, AnalysisError> {
        validate_input(samples, sample_rate)?;

        log::debug!(
            "Detecting tempo: {} samples at {} Hz, range [{:.1}, {:.1}] BPM",
            samples.len(),
            sample_rate,
            self.config.tempo_range.min_bpm(),
            self.config.tempo_range.max_bpm()
        );

        let estimates: Vec<(Algorithm, f32)> = if self.config.parallel {
            Algorithm::ALL
                .par_iter()
                .map(|&algorithm| (algorithm, self.run_isolated(samples, sample_rate, algorithm)))
                .collect()
        } else {
            Algorithm::ALL
                .iter()
                .map(|&algorithm| (algorithm, self.run_isolated(samples, sample_rate, algorithm)))
                .collect()
        };

        Ok(score_confidences(&estimates))
    }

    /// Downmix a (possibly multi-channel) buffer and run every algorithm
    ///
    /// # Errors
    ///
    /// Same as [`BpmDetector::detect_all`]
    pub fn detect_buffer(
        &self,
        buffer: SampleBuffer<'_>,
        sample_rate: u32,
    ) -> Result<ResultSet, AnalysisError> {
        if buffer.is_empty() {
            return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
        }
        if buffer.channels() > 1 {
            log::debug!("Downmixing {} channels to mono", buffer.channels());
        }
        let mono = buffer.to_mono();
        self.detect_all(&mono, sample_rate)
    }

    /// Run [`BpmDetector::detect_buffer`] over many inputs in parallel
    ///
    /// Each `(buffer, sample_rate)` pair is independent: the outcome of one
    /// input never affects another. Results keep the input order.
    pub fn detect_batch(
        &self,
        inputs: &[(SampleBuffer<'_>, u32)],
    ) -> Vec<Result<ResultSet, AnalysisError>> {
        log::debug!("Batch detection over {} inputs", inputs.len());
        inputs
            .par_iter()
            .map(|&(buffer, sample_rate)| self.detect_buffer(buffer, sample_rate))
            .collect()
    }

    /// Run one estimator, turning its failure into "no detection"
    fn run_isolated(&self, samples: &[f32], sample_rate: u32, algorithm: Algorithm) -> f32 {
        let range = &self.config.tempo_range;
        let outcome = match algorithm {
            Algorithm::Autocorrelation => estimate_bpm_autocorrelation(samples, sample_rate, range),
            Algorithm::SpectralFlux => estimate_bpm_median_interval(samples, sample_rate, range),
            Algorithm::WindowedEnergyFlux => estimate_bpm_density(samples, sample_rate, range),
        };

        match outcome {
            Ok(bpm) if bpm.is_finite() && bpm > 0.0 => bpm,
            Ok(_) => 0.0,
            Err(e) => {
                log::warn!("{} estimator failed, reporting no detection: {}", algorithm, e);
                0.0
            }
        }
    }
}

fn validate_input(samples: &[f32], sample_rate: u32) -> Result<(), AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }
    Ok(())
}
