//! Autocorrelation-based BPM estimation
//!
//! Finds periodicity in the onset-strength envelope using FFT-accelerated
//! autocorrelation.
//!
//! # Algorithm
//!
//! 1. Normalize the waveform by its peak amplitude (silence: no detection)
//! 2. Compute the onset-strength envelope (hop 512)
//! 3. Convert the tempo range to a lag window:
//!    `min_lag = ⌊60·sr / (hop·max_bpm)⌋`, `max_lag = ⌊60·sr / (hop·min_bpm)⌋`
//! 4. Autocorrelate the envelope (`ACF = IFFT(|FFT(env)|²)`), keep lags `[min_lag, max_lag)`
//! 5. Pick local maxima at least `min_lag` lags apart
//! 6. The highest peak wins: `BPM = 60·sr / (hop·lag)`, accepted only inside the range
//!
//! # Reference
//!
//! Ellis, D. P. W., & Pikrakis, A. (2006). Real-time Beat Induction.
//! *Proceedings of the International Conference on Music Information Retrieval*.
//!
//! # Example
//!
//! ```no_run
//! use tempo_dsp::config::TempoRange;
//! use tempo_dsp::features::period::autocorrelation::estimate_bpm_autocorrelation;
//!
//! let samples = vec![0.0f32; 44100 * 10];
//! let bpm = estimate_bpm_autocorrelation(&samples, 44100, &TempoRange::default())?;
//! # Ok::<(), tempo_dsp::AnalysisError>(())
//! ```

use super::peak_picking::find_peaks;
use crate::config::TempoRange;
use crate::error::AnalysisError;
use crate::features::onset::onset_strength::onset_strength;
use crate::preprocessing::normalization::peak_normalized;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Hop between onset-envelope frames in samples
pub const HOP_LENGTH: usize = 512;

/// Estimate BPM from the autocorrelation of the onset-strength envelope
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `range` - Admissible tempo range
///
/// # Returns
///
/// The BPM estimate, or 0.0 when no periodicity is found inside the range
///
/// # Errors
///
/// Returns `AnalysisError` if the sample rate is zero or the envelope cannot be
/// computed (signal too short to filter). The detector turns such errors into
/// "no detection" for this algorithm only.
pub fn estimate_bpm_autocorrelation(
    samples: &[f32],
    sample_rate: u32,
    range: &TempoRange,
) -> Result<f32, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    let Some(normalized) = peak_normalized(samples) else {
        log::debug!("Autocorrelation: silent input, no detection");
        return Ok(0.0);
    };

    let envelope = onset_strength(&normalized, sample_rate, HOP_LENGTH)?;

    let lags_per_minute = 60.0 * sample_rate as f64 / HOP_LENGTH as f64;
    let min_lag = (lags_per_minute / range.max_bpm() as f64).floor() as usize;
    let max_lag = (lags_per_minute / range.min_bpm() as f64).floor() as usize;

    log::debug!(
        "Estimating BPM from autocorrelation: {} envelope frames, lag window [{}, {})",
        envelope.len(),
        min_lag,
        max_lag
    );

    let acf = compute_autocorrelation_fft(&envelope);

    let end = max_lag.min(acf.len());
    if min_lag >= end {
        log::debug!(
            "Lag window [{}, {}) outside ACF of length {}",
            min_lag,
            max_lag,
            acf.len()
        );
        return Ok(0.0);
    }
    let window = &acf[min_lag..end];

    let peaks = find_peaks(window, None, min_lag);

    // First maximum wins on ties
    let best = peaks.iter().copied().fold(None, |best: Option<usize>, p| match best {
        Some(b) if window[b] >= window[p] => Some(b),
        _ => Some(p),
    });

    let Some(best) = best else {
        log::debug!("No autocorrelation peak inside the tempo range");
        return Ok(0.0);
    };

    let lag = best + min_lag;
    if lag == 0 {
        return Ok(0.0);
    }
    let bpm = (lags_per_minute / lag as f64) as f32;

    log::debug!(
        "Autocorrelation: best lag {} -> {:.2} BPM ({} peaks)",
        lag,
        bpm,
        peaks.len()
    );

    if range.contains(bpm) {
        Ok(bpm)
    } else {
        Ok(0.0)
    }
}

/// Compute autocorrelation using FFT acceleration
///
/// Uses the identity: ACF = IFFT(|FFT(signal)|²), zero-padded to avoid circular
/// wrap-around. Entry `k` is `Σ signal[i]·signal[i+k]` for lags `0..n`;
/// negative correlations are kept.
pub fn compute_autocorrelation_fft(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    // FFT size: next power of 2 >= 2*n (for zero-padding)
    let fft_size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .map(|&x| Complex::new(x as f64, 0.0))
        .collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    for x in &mut buffer {
        *x = Complex::new(x.norm_sqr(), 0.0);
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_size as f64;
    buffer[..n].iter().map(|x| (x.re * scale) as f32).collect()
}
