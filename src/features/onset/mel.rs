//! Mel-scale weighting of linear-frequency spectra
//!
//! Every linear FFT bin gets one mel band: a Gaussian bump over the mel axis
//! centred on that bin's mel frequency, with a width equal to the mel spacing
//! of the first two bins. Rows are L1-normalized so each band is a weighted
//! average of neighbouring bins.

/// Weights beyond this many standard deviations are dropped (< 2e-8 relative)
const CUTOFF_SIGMAS: f32 = 6.0;

/// Convert a frequency in Hz to mels: `2595 * log10(1 + f / 700)`
pub fn hz_to_mel(freq_hz: f32) -> f32 {
    2595.0 * (1.0 + freq_hz / 700.0).log10()
}

/// One row of the weighting matrix: contiguous non-zero weights starting at `start`
#[derive(Debug, Clone)]
struct MelRow {
    start: usize,
    weights: Vec<f32>,
}

/// Sparse, banded mel weighting matrix (`n_bins × n_bins`)
#[derive(Debug, Clone)]
pub struct MelWeights {
    rows: Vec<MelRow>,
}

impl MelWeights {
    /// Build the weighting matrix for an `n_fft`-point spectrum at `sample_rate`
    pub fn new(sample_rate: u32, n_fft: usize) -> Self {
        let n_bins = n_fft / 2 + 1;
        let nyquist = sample_rate as f32 / 2.0;
        let step = if n_bins > 1 {
            nyquist / (n_bins - 1) as f32
        } else {
            0.0
        };
        let mel: Vec<f32> = (0..n_bins).map(|k| hz_to_mel(k as f32 * step)).collect();

        let width = if n_bins > 1 { mel[1] - mel[0] } else { 0.0 };

        let rows = (0..n_bins)
            .map(|i| {
                if width <= 0.0 {
                    return MelRow {
                        start: i,
                        weights: vec![1.0],
                    };
                }

                // Mel frequencies are increasing, so the support is contiguous
                let reach = CUTOFF_SIGMAS * width;
                let start = mel[..i].partition_point(|&m| mel[i] - m > reach);
                let end = i + 1 + mel[i + 1..].partition_point(|&m| m - mel[i] <= reach);

                let mut weights: Vec<f32> = mel[start..end]
                    .iter()
                    .map(|&m| {
                        let z = (mel[i] - m) / width;
                        (-0.5 * z * z).exp()
                    })
                    .collect();

                let total: f32 = weights.iter().sum();
                for w in &mut weights {
                    *w /= total;
                }

                MelRow { start, weights }
            })
            .collect();

        Self { rows }
    }

    /// Number of mel bands (equal to the number of linear bins)
    pub fn n_bands(&self) -> usize {
        self.rows.len()
    }

    /// Apply the weighting to one magnitude spectrum
    pub fn apply(&self, magnitudes: &[f32]) -> Vec<f32> {
        self.rows
            .iter()
            .map(|row| {
                row.weights
                    .iter()
                    .zip(&magnitudes[row.start..])
                    .map(|(&w, &m)| w * m)
                    .sum()
            })
            .collect()
    }
}
