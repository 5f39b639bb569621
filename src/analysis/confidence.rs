//! Confidence scoring module
//!
//! Scores every algorithm's tempo estimate against the others. An estimate is
//! trusted more when it sits close to a whole BPM and when the other algorithms
//! land on (nearly) the same whole BPM.
//!
//! # Confidence Components
//!
//! 1. **Integer proximity**: `1 - min(|b - round(b)|, 0.5) / 0.5`
//! 2. **Agreement**: share of the other estimates whose rounded value is within
//!    ±1 BPM of `round(b)`
//! 3. **Confidence**: `0.6 * proximity + 0.4 * agreement`, or proximity alone when
//!    no other distinct estimate exists
//!
//! Fewer than two detected estimates means there is nothing to cross-check:
//! every confidence is 0.0. Undetected estimates (BPM 0) always score 0.0.
//!
//! # Example
//!
//! ```
//! use tempo_dsp::analysis::confidence::score_confidences;
//! use tempo_dsp::analysis::result::Algorithm;
//!
//! let results = score_confidences(&[
//!     (Algorithm::Autocorrelation, 0.0),
//!     (Algorithm::SpectralFlux, 128.0),
//!     (Algorithm::WindowedEnergyFlux, 127.8),
//! ]);
//!
//! assert_eq!(results.get(Algorithm::Autocorrelation).unwrap().confidence, 0.0);
//! assert!((results.get(Algorithm::SpectralFlux).unwrap().confidence - 1.0).abs() < 1e-6);
//! ```

use super::result::{Algorithm, EstimationResult, ResultSet};

/// Weight of integer proximity in the combined score
const INTEGER_WEIGHT: f64 = 0.6;

/// Weight of cross-algorithm agreement in the combined score
const AGREEMENT_WEIGHT: f64 = 0.4;

/// Deviation from a whole BPM at which proximity reaches zero
const MAX_INTEGER_DEVIATION: f64 = 0.5;

/// Estimates closer than this are treated as the same value
const SAME_VALUE_EPSILON: f64 = 0.001;

/// Rounded estimates within this many BPM agree
const AGREEMENT_WINDOW: f64 = 1.0;

/// Closeness of `bpm` to a whole number, in [0, 1]
pub fn integer_proximity(bpm: f64) -> f64 {
    let deviation = (bpm - bpm.round_ties_even()).abs();
    1.0 - deviation.min(MAX_INTEGER_DEVIATION) / MAX_INTEGER_DEVIATION
}

/// Share of `others` whose rounded value is within ±1 BPM of `round(bpm)`
///
/// Returns `None` when `others` is empty.
pub fn agreement(bpm: f64, others: &[f64]) -> Option<f64> {
    if others.is_empty() {
        return None;
    }
    let nearest = bpm.round_ties_even();
    let agreeing = others
        .iter()
        .filter(|&&o| (o.round_ties_even() - nearest).abs() <= AGREEMENT_WINDOW)
        .count();
    Some(agreeing as f64 / others.len() as f64)
}

/// Score the raw BPM of every algorithm
///
/// # Arguments
///
/// * `estimates` - One `(algorithm, bpm)` pair per algorithm; a BPM of 0 (or
///   below) means no detection
///
/// # Returns
///
/// A `ResultSet` with each estimate and its confidence in [0, 1]
pub fn score_confidences(estimates: &[(Algorithm, f32)]) -> ResultSet {
    let valid: Vec<f64> = estimates
        .iter()
        .filter(|(_, bpm)| *bpm > 0.0)
        .map(|(_, bpm)| *bpm as f64)
        .collect();

    if valid.len() < 2 {
        log::debug!(
            "{} detected estimate(s), not enough to cross-check: confidences are 0",
            valid.len()
        );
        return estimates
            .iter()
            .map(|&(algorithm, bpm)| {
                let bpm = if bpm > 0.0 { bpm } else { 0.0 };
                (algorithm, EstimationResult { bpm, confidence: 0.0 })
            })
            .collect();
    }

    estimates
        .iter()
        .map(|&(algorithm, bpm)| {
            if bpm <= 0.0 {
                return (algorithm, EstimationResult::NONE);
            }

            let b = bpm as f64;
            let proximity = integer_proximity(b);
            let others: Vec<f64> = valid
                .iter()
                .copied()
                .filter(|o| (o - b).abs() > SAME_VALUE_EPSILON)
                .collect();

            let confidence = match agreement(b, &others) {
                Some(agree) => INTEGER_WEIGHT * proximity + AGREEMENT_WEIGHT * agree,
                None => proximity,
            };

            log::debug!(
                "{}: {:.2} BPM, proximity {:.3}, {} other estimate(s) -> confidence {:.3}",
                algorithm,
                bpm,
                proximity,
                others.len(),
                confidence
            );

            (
                algorithm,
                EstimationResult {
                    bpm,
                    confidence: confidence as f32,
                },
            )
        })
        .collect()
}
