//! Peak normalization
//!
//! Estimators that work on a normalized waveform divide by the peak absolute
//! amplitude. Silence has no peak to divide by and is reported as `None` so the
//! caller can short-circuit to "no detection".

/// Peak absolute amplitude of a signal (0.0 for an empty signal)
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
}

/// Return a copy of `samples` scaled so the peak absolute amplitude is 1.0
///
/// # Returns
///
/// `None` if the signal is empty, silent (peak 0) or contains non-finite values
///
/// # Example
///
/// ```
/// use tempo_dsp::preprocessing::normalization::peak_normalized;
///
/// let normalized = peak_normalized(&[0.25, -0.5]).unwrap();
/// assert_eq!(normalized, vec![0.5, -1.0]);
/// assert!(peak_normalized(&[0.0; 16]).is_none());
/// ```
pub fn peak_normalized(samples: &[f32]) -> Option<Vec<f32>> {
    let peak = peak_amplitude(samples);

    if peak <= 0.0 || !peak.is_finite() {
        log::debug!("Signal is silent or non-finite (peak={}), skipping normalization", peak);
        return None;
    }

    Some(samples.iter().map(|&x| x / peak).collect())
}
