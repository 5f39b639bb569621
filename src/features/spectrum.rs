//! Windowing and FFT magnitude utilities
//!
//! Shared by the onset-strength extractor (short-time Fourier transform) and the
//! spectral-flux detector (one magnitude spectrum per zero-padded frame).

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Periodic Hann window (DFT-even), as used for spectral analysis
///
/// `w[n] = 0.5 - 0.5 * cos(2πn / N)`
pub fn hann_periodic(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / size as f32).cos())
        .collect()
}

/// Symmetric Hann window (both end points zero)
///
/// `w[n] = 0.5 - 0.5 * cos(2πn / (N - 1))`
pub fn hann_symmetric(size: usize) -> Vec<f32> {
    match size {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (size - 1) as f32;
            (0..size)
                .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / denom).cos())
                .collect()
        }
    }
}

/// Magnitude spectrum calculator with a planned forward FFT and local scratch
///
/// Frames shorter than the FFT size are zero-padded at the end; longer frames
/// are truncated.
pub struct MagnitudeSpectrum {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    n_fft: usize,
}

impl MagnitudeSpectrum {
    /// Plan a forward FFT of size `n_fft`
    pub fn new(n_fft: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n_fft);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); n_fft],
            scratch,
            n_fft,
        }
    }

    /// Number of one-sided bins (`n_fft / 2 + 1`)
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Compute `|FFT(frame * window) * scale|` for the one-sided bins into `out`
    ///
    /// `window`, when given, must be at least as long as the used part of `frame`.
    pub fn compute_into(&mut self, frame: &[f32], window: Option<&[f32]>, scale: f32, out: &mut [f32]) {
        let used = frame.len().min(self.n_fft);
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < used {
                match window {
                    Some(w) => frame[i] * w[i],
                    None => frame[i],
                }
            } else {
                0.0
            };
            *slot = Complex::new(sample, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (o, c) in out.iter_mut().zip(self.buffer.iter()).take(self.n_bins()) {
            *o = c.norm() * scale;
        }
    }

    /// Allocating variant of [`MagnitudeSpectrum::compute_into`]
    pub fn compute(&mut self, frame: &[f32], window: Option<&[f32]>, scale: f32) -> Vec<f32> {
        let mut out = vec![0.0f32; self.n_bins()];
        self.compute_into(frame, window, scale, &mut out);
        out
    }
}

/// Short-time Fourier transform magnitudes
///
/// The signal is zero-extended by `n_fft / 2` samples on both sides, then
/// zero-padded at the end so that frames of `n_fft` samples spaced `hop` apart
/// tile it exactly. Every frame is multiplied by a periodic Hann window and the
/// spectrum is scaled by `1 / sum(window)`.
///
/// # Returns
///
/// Spectrogram as `n_frames` vectors of `n_fft / 2 + 1` magnitudes
pub fn stft_magnitudes(samples: &[f32], n_fft: usize, hop: usize) -> Vec<Vec<f32>> {
    if samples.is_empty() || n_fft == 0 || hop == 0 || hop > n_fft {
        return Vec::new();
    }

    let half = n_fft / 2;
    let extended_len = samples.len() + 2 * half;
    let remainder = (extended_len - n_fft) % hop;
    let pad_end = if remainder == 0 { 0 } else { hop - remainder };

    let mut extended = vec![0.0f32; extended_len + pad_end];
    extended[half..half + samples.len()].copy_from_slice(samples);

    let window = hann_periodic(n_fft);
    let window_sum: f32 = window.iter().sum();
    let scale = if window_sum > 0.0 { 1.0 / window_sum } else { 1.0 };

    let n_frames = (extended.len() - n_fft) / hop + 1;
    log::debug!(
        "Computing STFT: {} samples, n_fft={}, hop={}, {} frames",
        samples.len(),
        n_fft,
        hop,
        n_frames
    );

    let mut spectrum = MagnitudeSpectrum::new(n_fft);
    (0..n_frames)
        .map(|i| {
            let start = i * hop;
            spectrum.compute(&extended[start..start + n_fft], Some(&window), scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_windows() {
        let periodic = hann_periodic(4);
        assert!((periodic[0]).abs() < 1e-6);
        assert!((periodic[2] - 1.0).abs() < 1e-6);

        let symmetric = hann_symmetric(5);
        assert!(symmetric[0].abs() < 1e-6);
        assert!(symmetric[4].abs() < 1e-6);
        assert!((symmetric[2] - 1.0).abs() < 1e-6);

        assert!(hann_symmetric(0).is_empty());
        assert_eq!(hann_symmetric(1), vec![1.0]);
    }

    #[test]
    fn test_magnitude_spectrum_of_sinusoid() {
        // Bin-centred sinusoid: all energy lands in bin 8
        let n = 64;
        let frame: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * 8.0 * i as f32 / n as f32).cos())
            .collect();
        let mut spectrum = MagnitudeSpectrum::new(n);
        let mags = spectrum.compute(&frame, None, 1.0);

        assert_eq!(mags.len(), 33);
        let peak_bin = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 8);
        assert!((mags[8] - 32.0).abs() < 1e-3);
    }

    #[test]
    fn test_short_frame_is_zero_padded() {
        let mut spectrum = MagnitudeSpectrum::new(16);
        let mags = spectrum.compute(&[1.0, 1.0], None, 1.0);
        // DC bin of a zero-padded [1, 1] frame is 2
        assert!((mags[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_stft_frame_count() {
        // 4096 samples + 2048 extension = 6144 = 2048 + 8 * 512
        let frames = stft_magnitudes(&vec![0.1f32; 4096], 2048, 512);
        assert_eq!(frames.len(), 9);
        assert!(frames.iter().all(|f| f.len() == 1025));

        // Non-tiling length gets padded up to the next whole hop
        let frames = stft_magnitudes(&vec![0.1f32; 4100], 2048, 512);
        assert_eq!(frames.len(), 10);
    }

    #[test]
    fn test_stft_empty() {
        assert!(stft_magnitudes(&[], 2048, 512).is_empty());
        assert!(stft_magnitudes(&[1.0], 2048, 0).is_empty());
    }
}
