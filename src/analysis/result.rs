//! Analysis result types

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tempo estimation algorithm
///
/// The set is closed; the declaration order is the order results are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Autocorrelation of the onset-strength envelope
    #[serde(rename = "autocorrelation")]
    Autocorrelation,
    /// Median interval between spectral-flux peaks
    #[serde(rename = "energy flux")]
    SpectralFlux,
    /// Kernel density of windowed-energy-flux intervals
    #[serde(rename = "web style")]
    WindowedEnergyFlux,
}

impl Algorithm {
    /// Every algorithm, in reporting order
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Autocorrelation,
        Algorithm::SpectralFlux,
        Algorithm::WindowedEnergyFlux,
    ];

    /// Stable identifier of the algorithm
    ///
    /// # Example
    ///
    /// ```
    /// use tempo_dsp::analysis::result::Algorithm;
    ///
    /// assert_eq!(Algorithm::SpectralFlux.name(), "energy flux");
    /// assert_eq!("web style".parse::<Algorithm>()?, Algorithm::WindowedEnergyFlux);
    /// assert!("soundtouch".parse::<Algorithm>().is_err());
    /// # Ok::<(), tempo_dsp::AnalysisError>(())
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Autocorrelation => "autocorrelation",
            Algorithm::SpectralFlux => "energy flux",
            Algorithm::WindowedEnergyFlux => "web style",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| AnalysisError::UnknownAlgorithm(s.to_string()))
    }
}

/// Confidence band shown next to a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// Confidence below 0.2
    VeryLow,
    /// Confidence in [0.2, 0.4)
    Low,
    /// Confidence in [0.4, 0.6)
    Medium,
    /// Confidence of 0.6 or more
    High,
}

impl ConfidenceLevel {
    /// Band a confidence score
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.6 {
            ConfidenceLevel::High
        } else if confidence >= 0.4 {
            ConfidenceLevel::Medium
        } else if confidence >= 0.2 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::VeryLow => "very low",
        };
        f.write_str(label)
    }
}

/// Tempo estimate of one algorithm
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EstimationResult {
    /// BPM estimate; 0.0 means no detection
    pub bpm: f32,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

impl EstimationResult {
    /// Result carrying no detection
    pub const NONE: EstimationResult = EstimationResult {
        bpm: 0.0,
        confidence: 0.0,
    };

    /// Whether the algorithm produced a tempo
    pub fn is_detected(&self) -> bool {
        self.bpm > 0.0
    }

    /// BPM rounded to the nearest whole number
    pub fn rounded_bpm(&self) -> f32 {
        self.bpm.round()
    }

    /// Confidence band of this result
    pub fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }
}

/// Results of every algorithm for one input, keyed and ordered by algorithm
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    results: BTreeMap<Algorithm, EstimationResult>,
}

impl ResultSet {
    /// Result of `algorithm`, if it ran
    pub fn get(&self, algorithm: Algorithm) -> Option<&EstimationResult> {
        self.results.get(&algorithm)
    }

    /// Results in algorithm order
    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &EstimationResult)> {
        self.results.iter().map(|(&a, r)| (a, r))
    }

    /// Number of results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the set holds no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Detected result with the highest confidence (earliest algorithm on ties)
    pub fn best(&self) -> Option<(Algorithm, &EstimationResult)> {
        self.iter()
            .filter(|(_, r)| r.is_detected())
            .fold(None, |best, (a, r)| match best {
                Some((_, b)) if b.confidence >= r.confidence => best,
                _ => Some((a, r)),
            })
    }
}

impl FromIterator<(Algorithm, EstimationResult)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (Algorithm, EstimationResult)>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
