//! Butterworth high-pass filtering with zero-phase (forward-backward) application
//!
//! Removes slow drift from per-band onset curves without shifting their peaks
//! in time.

use crate::error::AnalysisError;
use std::f64::consts::PI;

/// Butterworth Q factor (1/sqrt(2)) for maximally-flat magnitude response
const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Second-order IIR coefficients, normalized so that `a0 = 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// 2nd-order Butterworth high-pass at `cutoff_hz` for a signal sampled at `sample_rate_hz`
    ///
    /// Bilinear transform with pre-warping at the cutoff.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` unless `0 < cutoff_hz < sample_rate_hz / 2`.
    pub fn butterworth_highpass(cutoff_hz: f64, sample_rate_hz: f64) -> Result<Self, AnalysisError> {
        if !(cutoff_hz > 0.0 && sample_rate_hz > 0.0 && cutoff_hz < sample_rate_hz / 2.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "High-pass cutoff {:.3} Hz invalid for sample rate {:.3} Hz",
                cutoff_hz, sample_rate_hz
            )));
        }

        let w0 = 2.0 * PI * cutoff_hz / sample_rate_hz;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * BUTTERWORTH_Q);

        let a0 = 1.0 + alpha;
        Ok(Self {
            b0: (1.0 + cos_w0) / 2.0 / a0,
            b1: -(1.0 + cos_w0) / a0,
            b2: (1.0 + cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        })
    }

    /// Steady-state filter state for a unit step input (transposed direct form II)
    fn step_state(&self) -> [f64; 2] {
        let r0 = self.b1 - self.a1 * self.b0;
        let r1 = self.b2 - self.a2 * self.b0;
        let z0 = (r0 + r1) / (1.0 + self.a1 + self.a2);
        let z1 = r1 - self.a2 * z0;
        [z0, z1]
    }

    /// Run the filter over `signal` in place, starting from state `z`
    fn run(&self, signal: &mut [f64], mut z: [f64; 2]) {
        for x in signal.iter_mut() {
            let input = *x;
            let output = self.b0 * input + z[0];
            z[0] = self.b1 * input - self.a1 * output + z[1];
            z[1] = self.b2 * input - self.a2 * output;
            *x = output;
        }
    }

    /// Number of samples of odd extension added at each end by [`Biquad::filtfilt`]
    pub const PAD_LEN: usize = 9;

    /// Zero-phase filtering: forward pass, backward pass, no net delay
    ///
    /// The signal is extended at both ends by point-reflection about its end
    /// samples, and each pass starts from the steady state matching its first
    /// sample, which suppresses start-up transients.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ProcessingError` if the signal is not longer than
    /// [`Biquad::PAD_LEN`] samples.
    pub fn filtfilt(&self, signal: &[f32]) -> Result<Vec<f32>, AnalysisError> {
        let n = signal.len();
        let pad = Self::PAD_LEN;
        if n <= pad {
            return Err(AnalysisError::ProcessingError(format!(
                "Signal of {} samples too short for zero-phase filtering (needs > {})",
                n, pad
            )));
        }

        let first = signal[0] as f64;
        let last = signal[n - 1] as f64;

        let mut ext = Vec::with_capacity(n + 2 * pad);
        ext.extend((1..=pad).rev().map(|i| 2.0 * first - signal[i] as f64));
        ext.extend(signal.iter().map(|&x| x as f64));
        ext.extend((1..=pad).map(|i| 2.0 * last - signal[n - 1 - i] as f64));

        let zi = self.step_state();

        let x0 = ext[0];
        self.run(&mut ext, [zi[0] * x0, zi[1] * x0]);

        ext.reverse();
        let y0 = ext[0];
        self.run(&mut ext, [zi[0] * y0, zi[1] * y0]);
        ext.reverse();

        Ok(ext[pad..pad + n].iter().map(|&y| y as f32).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highpass() -> Biquad {
        Biquad::butterworth_highpass(0.1, 44100.0 / 512.0).unwrap()
    }

    #[test]
    fn test_invalid_cutoff() {
        assert!(Biquad::butterworth_highpass(0.0, 100.0).is_err());
        assert!(Biquad::butterworth_highpass(60.0, 100.0).is_err());
        assert!(Biquad::butterworth_highpass(1.0, 0.0).is_err());
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let filter = highpass();
        // Gain at DC: (b0 + b1 + b2) / (1 + a1 + a2) == 0
        let dc_gain = filter.b0 + filter.b1 + filter.b2;
        assert!(dc_gain.abs() < 1e-12);
    }

    #[test]
    fn test_filtfilt_removes_constant_offset() {
        // Steady-state initial conditions make a constant input vanish entirely
        let filtered = highpass().filtfilt(&vec![0.7f32; 200]).unwrap();
        assert!(filtered.iter().all(|&v| v.abs() < 1e-4));
    }

    #[test]
    fn test_filtfilt_keeps_fast_components() {
        // 20 Hz at an 86 Hz frame rate is far above the 0.1 Hz cutoff
        let fs = 44100.0 / 512.0;
        let signal: Vec<f32> = (0..400)
            .map(|i| (2.0 * std::f32::consts::PI * 20.0 * i as f32 / fs as f32).sin())
            .collect();
        let filtered = highpass().filtfilt(&signal).unwrap();
        for (a, b) in signal.iter().zip(filtered.iter()).skip(50).take(300) {
            assert!((a - b).abs() < 0.05);
        }
    }

    #[test]
    fn test_filtfilt_too_short() {
        assert!(highpass().filtfilt(&[1.0; 9]).is_err());
        assert!(highpass().filtfilt(&[1.0; 10]).is_ok());
    }
}
