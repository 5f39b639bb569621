//! Windowed energy flux
//!
//! Detects transients from frame-by-frame energy increases of the windowed
//! waveform.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Apply a symmetric Hann window and compute energy: `E[n] = Σ (w·x)²`
//! 3. Compute energy derivative (flux): `E_flux[n] = max(0, E[n+1] - E[n])`
//! 4. Normalize by the maximum flux
//!
//! # Example
//!
//! ```no_run
//! use tempo_dsp::features::onset::energy_flux::windowed_energy_flux;
//!
//! let samples = vec![0.0f32; 44100 * 30]; // 30 seconds of audio
//! let flux = windowed_energy_flux(&samples, 2048, 512)?;
//! println!("{} flux values", flux.map(|f| f.len()).unwrap_or(0));
//! # Ok::<(), tempo_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use crate::features::spectrum::hann_symmetric;

/// Compute the normalized windowed energy flux curve
///
/// # Arguments
///
/// * `samples` - Audio samples (mono, normalized to [-1.0, 1.0])
/// * `frame_size` - Frame size for analysis (typically 2048)
/// * `hop_size` - Hop size between frames (typically 512)
///
/// # Returns
///
/// `Some(flux)` with `n_frames - 1` values in [0, 1], or `None` when the signal
/// has fewer than two frames or no energy increase at all
///
/// # Errors
///
/// Returns `AnalysisError` if frame or hop size is zero
///
/// # Example
///
/// ```
/// use tempo_dsp::features::onset::energy_flux::windowed_energy_flux;
///
/// let silence = vec![0.0f32; 44100];
/// assert!(windowed_energy_flux(&silence, 2048, 512)?.is_none());
/// # Ok::<(), tempo_dsp::AnalysisError>(())
/// ```
pub fn windowed_energy_flux(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Option<Vec<f32>>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    let num_frames = if samples.len() >= frame_size {
        (samples.len() - frame_size) / hop_size + 1
    } else {
        0
    };

    if num_frames < 2 {
        log::warn!(
            "Need at least 2 frames of {} samples for energy flux, audio has {} samples",
            frame_size,
            samples.len()
        );
        return Ok(None);
    }

    log::debug!(
        "Computing windowed energy flux: {} samples, frame={}, hop={}, {} frames",
        samples.len(),
        frame_size,
        hop_size,
        num_frames
    );

    let window = hann_symmetric(frame_size);

    let frame_energies: Vec<f64> = (0..num_frames)
        .map(|i| {
            let start = i * hop_size;
            samples[start..start + frame_size]
                .iter()
                .zip(window.iter())
                .map(|(&x, &w)| {
                    let v = (x * w) as f64;
                    v * v
                })
                .sum()
        })
        .collect();

    let mut energy_flux: Vec<f64> = frame_energies
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).max(0.0))
        .collect();

    let max_flux = energy_flux.iter().copied().fold(0.0f64, f64::max);
    if max_flux <= 0.0 {
        log::debug!("All energy flux values are zero or negative, no transients");
        return Ok(None);
    }

    for value in &mut energy_flux {
        *value /= max_flux;
    }

    Ok(Some(energy_flux.into_iter().map(|v| v as f32).collect()))
}
