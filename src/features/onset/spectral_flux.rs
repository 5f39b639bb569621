//! Spectral flux between overlapping frames
//!
//! Detects broadband energy transients directly from frame-to-frame changes
//! of the magnitude spectrum.
//!
//! Algorithm:
//! 1. Slide frames of `frame_size` samples, `hop_size` apart, over the signal
//! 2. Zero-pad each frame to `n_fft` and take its magnitude spectrum
//! 3. For each adjacent frame pair, sum the positive magnitude increases:
//!    `flux[i] = Σ max(0, |X_{i+1}(k)| - |X_i(k)|)`

use crate::error::AnalysisError;
use crate::features::spectrum::MagnitudeSpectrum;

/// Compute the positive spectral flux curve
///
/// One value is produced per hop step: `samples.len() / hop_size - 1` values.
/// Frames running past the end of the signal are shorter and are zero-padded
/// like every other frame.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `frame_size` - Frame length in samples (1024)
/// * `hop_size` - Hop between frames in samples (512)
/// * `n_fft` - FFT size each frame is zero-padded to (2048)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for zero sizes or a frame longer than the FFT.
pub fn spectral_flux(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
    n_fft: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if frame_size == 0 || hop_size == 0 || n_fft == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame, hop and FFT sizes must be > 0".to_string(),
        ));
    }
    if frame_size > n_fft {
        return Err(AnalysisError::InvalidInput(format!(
            "Frame size ({}) larger than FFT size ({})",
            frame_size, n_fft
        )));
    }

    let n_flux = (samples.len() / hop_size).saturating_sub(1);
    if n_flux == 0 {
        log::debug!(
            "Signal of {} samples too short for spectral flux (hop={})",
            samples.len(),
            hop_size
        );
        return Ok(Vec::new());
    }

    log::debug!(
        "Computing spectral flux: {} samples, frame={}, hop={}, n_fft={}",
        samples.len(),
        frame_size,
        hop_size,
        n_fft
    );

    let frame_at = |i: usize| {
        let start = (i * hop_size).min(samples.len());
        let end = (start + frame_size).min(samples.len());
        &samples[start..end]
    };

    let mut spectrum = MagnitudeSpectrum::new(n_fft);
    let mut previous = spectrum.compute(frame_at(0), None, 1.0);
    let mut current = vec![0.0f32; spectrum.n_bins()];

    let mut flux = Vec::with_capacity(n_flux);
    for i in 0..n_flux {
        spectrum.compute_into(frame_at(i + 1), None, 1.0, &mut current);
        let value: f32 = current
            .iter()
            .zip(previous.iter())
            .map(|(&cur, &prev)| (cur - prev).max(0.0))
            .sum();
        flux.push(value);
        std::mem::swap(&mut previous, &mut current);
    }

    Ok(flux)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectral_flux_length() {
        let samples = vec![0.1f32; 44100];
        let flux = spectral_flux(&samples, 1024, 512, 2048).unwrap();
        assert_eq!(flux.len(), 44100 / 512 - 1);
    }

    #[test]
    fn test_spectral_flux_step_onset() {
        // Silence then noise-like signal starting at sample 10240 (frame 20)
        let mut samples = vec![0.0f32; 22050];
        for (i, s) in samples.iter_mut().enumerate().skip(10240) {
            *s = if (i * 7919) % 13 < 6 { 0.5 } else { -0.5 };
        }
        let flux = spectral_flux(&samples, 1024, 512, 2048).unwrap();

        let (peak, _) = flux
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        // Pair (18, 19) or (19, 20) sees the signal arrive
        assert!((18..=19).contains(&peak), "peak at {}", peak);
        // Flux before the onset is exactly zero
        assert!(flux[..17].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_spectral_flux_silence() {
        let flux = spectral_flux(&vec![0.0f32; 8192], 1024, 512, 2048).unwrap();
        assert!(flux.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_spectral_flux_short_signal() {
        assert!(spectral_flux(&vec![0.5f32; 1000], 1024, 512, 2048)
            .unwrap()
            .is_empty());
        assert!(spectral_flux(&[], 1024, 512, 2048).unwrap().is_empty());
    }

    #[test]
    fn test_spectral_flux_invalid_params() {
        let samples = vec![0.0f32; 4096];
        assert!(spectral_flux(&samples, 0, 512, 2048).is_err());
        assert!(spectral_flux(&samples, 1024, 0, 2048).is_err());
        assert!(spectral_flux(&samples, 4096, 512, 2048).is_err());
    }
}
