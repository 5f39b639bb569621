//! Configuration parameters for tempo detection

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Default lower tempo bound in BPM
pub const DEFAULT_MIN_BPM: f32 = 92.0;

/// Default upper tempo bound in BPM
pub const DEFAULT_MAX_BPM: f32 = 184.0;

/// Admissible output interval for every estimator
///
/// Estimates falling outside the range are reported as "no detection" (BPM 0),
/// never clamped into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTempoRange")]
pub struct TempoRange {
    min_bpm: f32,
    max_bpm: f32,
}

#[derive(Deserialize)]
struct RawTempoRange {
    min_bpm: f32,
    max_bpm: f32,
}

impl TryFrom<RawTempoRange> for TempoRange {
    type Error = AnalysisError;

    fn try_from(raw: RawTempoRange) -> Result<Self, Self::Error> {
        TempoRange::new(raw.min_bpm, raw.max_bpm)
    }
}

impl TempoRange {
    /// Create a tempo range
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` unless `0 < min_bpm < max_bpm`
    /// and both bounds are finite.
    pub fn new(min_bpm: f32, max_bpm: f32) -> Result<Self, AnalysisError> {
        if !min_bpm.is_finite() || !max_bpm.is_finite() || min_bpm <= 0.0 || min_bpm >= max_bpm {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                min_bpm, max_bpm
            )));
        }
        Ok(Self { min_bpm, max_bpm })
    }

    /// Lower bound in BPM
    pub fn min_bpm(&self) -> f32 {
        self.min_bpm
    }

    /// Upper bound in BPM
    pub fn max_bpm(&self) -> f32 {
        self.max_bpm
    }

    /// Check whether `bpm` lies inside the closed range
    pub fn contains(&self, bpm: f32) -> bool {
        bpm >= self.min_bpm && bpm <= self.max_bpm
    }
}

impl Default for TempoRange {
    fn default() -> Self {
        Self {
            min_bpm: DEFAULT_MIN_BPM,
            max_bpm: DEFAULT_MAX_BPM,
        }
    }
}

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Admissible tempo range (default: 92-184 BPM)
    pub tempo_range: TempoRange,

    /// Run the estimators of one detection call on the rayon pool (default: true)
    /// Results are identical either way
    pub parallel: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tempo_range: TempoRange::default(),
            parallel: true,
        }
    }
}

impl DetectorConfig {
    /// Configuration with a custom tempo range and default everything else
    pub fn with_range(tempo_range: TempoRange) -> Self {
        Self {
            tempo_range,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range() {
        let range = TempoRange::default();
        assert_eq!(range.min_bpm(), 92.0);
        assert_eq!(range.max_bpm(), 184.0);
    }

    #[test]
    fn test_invalid_ranges_rejected() {
        assert!(TempoRange::new(0.0, 120.0).is_err());
        assert!(TempoRange::new(-10.0, 120.0).is_err());
        assert!(TempoRange::new(140.0, 120.0).is_err());
        assert!(TempoRange::new(120.0, 120.0).is_err());
        assert!(TempoRange::new(f32::NAN, 120.0).is_err());
        assert!(TempoRange::new(60.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = TempoRange::new(90.0, 180.0).unwrap();
        assert!(range.contains(90.0));
        assert!(range.contains(180.0));
        assert!(!range.contains(89.99));
        assert!(!range.contains(180.01));
    }

    #[test]
    fn test_config_defaults() {
        let config = DetectorConfig::default();
        assert!(config.parallel);
        assert_eq!(config.tempo_range, TempoRange::default());

        let custom = DetectorConfig::with_range(TempoRange::new(70.0, 140.0).unwrap());
        assert_eq!(custom.tempo_range.min_bpm(), 70.0);
        assert!(custom.parallel);
    }
}
