//! Onset-strength envelope
//!
//! Turns a waveform into a 1-D curve whose peaks mark perceptual onsets,
//! sampled at `sample_rate / hop_length`.
//!
//! Algorithm:
//! 1. STFT magnitudes (n_fft = 2048, periodic Hann)
//! 2. Mel weighting (one Gaussian band per bin), then `log(1 + x)` compression
//! 3. First-order difference along time, half-wave rectified
//! 4. Zero-phase 2nd-order Butterworth high-pass (0.1 Hz at the frame rate), per band
//! 5. Per-band z-score, mean across bands, divide by the maximum absolute value
//!
//! # Example
//!
//! ```no_run
//! use tempo_dsp::features::onset::onset_strength::onset_strength;
//!
//! let samples = vec![0.0f32; 44100 * 10];
//! let envelope = onset_strength(&samples, 44100, 512)?;
//! println!("{} envelope frames", envelope.len());
//! # Ok::<(), tempo_dsp::AnalysisError>(())
//! ```

use super::filter::Biquad;
use super::mel::MelWeights;
use crate::error::AnalysisError;
use crate::features::spectrum::stft_magnitudes;

/// FFT size for the onset spectrogram
pub const N_FFT: usize = 2048;

/// High-pass cutoff in Hz, relative to the envelope frame rate
const HIGHPASS_CUTOFF_HZ: f64 = 0.1;

/// Compute the onset-strength envelope of a mono signal
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `hop_length` - STFT hop in samples (envelope rate is `sample_rate / hop_length`)
///
/// # Returns
///
/// Envelope normalized so its maximum absolute value is 1.0. Silence (or any
/// input without spectral change) yields an all-zero envelope.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate or hop, and
/// `AnalysisError::ProcessingError` when the signal is too short to filter.
pub fn onset_strength(
    samples: &[f32],
    sample_rate: u32,
    hop_length: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }
    if hop_length == 0 || hop_length > N_FFT {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid hop length: {}",
            hop_length
        )));
    }

    log::debug!(
        "Computing onset strength: {} samples at {} Hz, hop={}",
        samples.len(),
        sample_rate,
        hop_length
    );

    // Steps 1-2: log-compressed mel spectrogram, stored band-major
    let spectrogram = stft_magnitudes(samples, N_FFT, hop_length);
    let n_frames = spectrogram.len();
    if n_frames < 2 {
        return Err(AnalysisError::ProcessingError(format!(
            "Need at least 2 STFT frames, got {}",
            n_frames
        )));
    }

    let mel = MelWeights::new(sample_rate, N_FFT);
    let n_bands = mel.n_bands();
    let mut bands = vec![vec![0.0f32; n_frames]; n_bands];
    for (t, frame) in spectrogram.iter().enumerate() {
        for (band, value) in mel.apply(frame).into_iter().enumerate() {
            bands[band][t] = value.ln_1p();
        }
    }

    // Step 4 filter, designed once for all bands
    let frame_rate = sample_rate as f64 / hop_length as f64;
    let highpass = Biquad::butterworth_highpass(HIGHPASS_CUTOFF_HZ, frame_rate)?;

    let n_diff = n_frames - 1;
    let mut envelope = vec![0.0f64; n_diff];
    let mut diff = vec![0.0f32; n_diff];

    for band in &bands {
        // Step 3: rectified first difference
        for (d, w) in diff.iter_mut().zip(band.windows(2)) {
            *d = (w[1] - w[0]).max(0.0);
        }

        // Step 4
        let filtered = highpass.filtfilt(&diff)?;

        // Step 5: z-score; a zero-variance band contributes nothing
        let n = filtered.len() as f64;
        let mean = filtered.iter().map(|&x| x as f64).sum::<f64>() / n;
        let variance = filtered
            .iter()
            .map(|&x| {
                let d = x as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let std = variance.sqrt();
        if std <= 0.0 || !std.is_finite() {
            continue;
        }

        for (acc, &x) in envelope.iter_mut().zip(filtered.iter()) {
            *acc += (x as f64 - mean) / std;
        }
    }

    let scale = 1.0 / n_bands as f64;
    for value in &mut envelope {
        *value *= scale;
    }

    let max_abs = envelope.iter().map(|v| v.abs()).fold(0.0f64, f64::max);
    if max_abs <= 0.0 || !max_abs.is_finite() {
        log::debug!("Onset envelope is flat, returning zeros");
        return Ok(vec![0.0; n_diff]);
    }

    let envelope: Vec<f32> = envelope.iter().map(|&v| (v / max_abs) as f32).collect();

    log::debug!("Onset strength: {} frames", envelope.len());

    Ok(envelope)
}
