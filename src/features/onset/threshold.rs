//! Thresholding utilities for onset detection
//!
//! Provides the statistics onset pickers threshold against: mean, population
//! standard deviation and a `mean + k * stddev` dynamic threshold.

use crate::error::AnalysisError;

/// Arithmetic mean (0.0 for an empty slice)
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64) as f32
}

/// Population standard deviation (0.0 for an empty slice)
pub fn std_dev(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values) as f64;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - m;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt() as f32
}

/// Compute a dynamic threshold `mean(values) + k * stddev(values)`
///
/// # Arguments
///
/// * `values` - Flux/energy values to threshold
/// * `k` - Multiplier for the standard deviation (0.1 for windowed energy flux)
///
/// # Errors
///
/// Returns `AnalysisError` if values are empty or `k` is negative
pub fn dynamic_threshold(values: &[f32], k: f32) -> Result<f32, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty values for threshold calculation".to_string(),
        ));
    }

    if k < 0.0 {
        return Err(AnalysisError::InvalidInput(
            "Standard deviation multiplier k must be non-negative".to_string(),
        ));
    }

    Ok(mean(values) + k * std_dev(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-6);
        assert!((std_dev(&values) - 2.0).abs() < 1e-6);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_dynamic_threshold() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let threshold = dynamic_threshold(&values, 0.1).unwrap();
        assert!((threshold - 5.2).abs() < 1e-5);

        // Constant input: threshold equals the constant
        let threshold = dynamic_threshold(&[0.3; 10], 0.1).unwrap();
        assert!((threshold - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_dynamic_threshold_invalid() {
        assert!(dynamic_threshold(&[], 0.1).is_err());
        assert!(dynamic_threshold(&[1.0], -1.0).is_err());
    }
}
