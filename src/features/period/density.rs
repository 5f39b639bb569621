//! Density-based tempo selection
//!
//! Picks the most supported tempo among noisy per-interval BPM candidates with a
//! Gaussian kernel density estimate evaluated on a uniform BPM grid.
//!
//! Algorithm:
//! 1. Peak-normalize the signal (silence: no detection)
//! 2. Windowed energy flux (Hann 2048, hop 512), normalized to [0, 1]
//! 3. Peaks above `mean + 0.1·stddev`, at least 0.35 s apart
//! 4. Every consecutive interval gives a candidate `60 / interval`; keep those in range
//! 5. Fit a Gaussian KDE (Scott's bandwidth) and return the densest of 200 grid points
//!    spanning the range

use super::intervals::{consecutive_intervals, median, peak_times};
use super::peak_picking::find_peaks;
use crate::config::TempoRange;
use crate::error::AnalysisError;
use crate::features::onset::energy_flux::windowed_energy_flux;
use crate::features::onset::threshold::dynamic_threshold;
use crate::preprocessing::normalization::peak_normalized;

/// Energy frame length in samples
pub const FRAME_SIZE: usize = 2048;

/// Hop between energy frames in samples
pub const HOP_SIZE: usize = 512;

/// Number of BPM grid points the density is evaluated on
pub const GRID_POINTS: usize = 200;

/// Standard deviation multiplier of the peak threshold
const THRESHOLD_K: f32 = 0.1;

/// Minimum spacing between energy peaks in seconds
const MIN_PEAK_SPACING_SECONDS: f64 = 0.35;

/// KDE bandwidths below this fraction of the grid step are treated as degenerate
const MIN_BANDWIDTH_FRACTION: f64 = 1e-3;

/// One-dimensional Gaussian kernel density estimate
///
/// Bandwidth follows Scott's rule: the kernel variance is the sample variance
/// (n − 1 denominator) scaled by `n^(-2/5)`.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    points: Vec<f64>,
    variance: f64,
}

impl GaussianKde {
    /// Fit a KDE to `points`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NumericalError` for fewer than two points or
    /// zero sample variance (the kernel would be degenerate)
    pub fn new(points: &[f64]) -> Result<Self, AnalysisError> {
        let n = points.len();
        if n < 2 {
            return Err(AnalysisError::NumericalError(format!(
                "KDE needs at least 2 points, got {}",
                n
            )));
        }

        let mean = points.iter().sum::<f64>() / n as f64;
        let sample_variance = points
            .iter()
            .map(|&x| (x - mean) * (x - mean))
            .sum::<f64>()
            / (n - 1) as f64;

        let variance = sample_variance * (n as f64).powf(-0.4);
        if variance <= 0.0 || !variance.is_finite() {
            return Err(AnalysisError::NumericalError(
                "KDE bandwidth is zero: all points are identical".to_string(),
            ));
        }

        Ok(Self {
            points: points.to_vec(),
            variance,
        })
    }

    /// Kernel bandwidth (standard deviation)
    pub fn bandwidth(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Estimated density at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0
            / (self.points.len() as f64 * (2.0 * std::f64::consts::PI * self.variance).sqrt());
        let sum: f64 = self
            .points
            .iter()
            .map(|&p| {
                let d = x - p;
                (-0.5 * d * d / self.variance).exp()
            })
            .sum();
        sum * norm
    }
}

/// `num` evenly spaced values from `start` to `stop`, both inclusive
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut grid: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            grid[num - 1] = stop;
            grid
        }
    }
}

/// Index of the first maximum in `values`
fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Grid point with the highest density over `candidates`
///
/// The KDE is degenerate when its bandwidth is negligible next to the grid
/// spacing (candidates that differ only by rounding noise, a single candidate,
/// identical candidates) or when every grid density underflows to zero. The
/// grid point nearest the median candidate is returned instead.
pub fn densest_grid_point(candidates: &[f64], grid: &[f64]) -> Option<f64> {
    if candidates.is_empty() || grid.is_empty() {
        return None;
    }

    let step = if grid.len() > 1 {
        (grid[1] - grid[0]).abs()
    } else {
        0.0
    };

    match GaussianKde::new(candidates) {
        Ok(kde) if kde.bandwidth() >= MIN_BANDWIDTH_FRACTION * step => {
            let densities: Vec<f64> = grid.iter().map(|&x| kde.evaluate(x)).collect();
            match argmax(&densities) {
                Some(i) if densities[i] > 0.0 && densities[i].is_finite() => Some(grid[i]),
                _ => {
                    log::debug!(
                        "KDE density vanishes on the grid; snapping to the nearest grid point"
                    );
                    nearest_grid_point(candidates, grid)
                }
            }
        }
        Ok(kde) => {
            log::debug!(
                "KDE bandwidth {:.3e} negligible against grid step {:.3e}; snapping to grid",
                kde.bandwidth(),
                step
            );
            nearest_grid_point(candidates, grid)
        }
        Err(e) => {
            log::debug!("{}; snapping to the nearest grid point", e);
            nearest_grid_point(candidates, grid)
        }
    }
}

/// Grid point closest to the median candidate
fn nearest_grid_point(candidates: &[f64], grid: &[f64]) -> Option<f64> {
    let target = median(candidates)?;
    let closeness: Vec<f64> = grid.iter().map(|&x| -(x - target).abs()).collect();
    argmax(&closeness).map(|i| grid[i])
}

/// Estimate BPM from the density of windowed-energy-flux beat intervals
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `range` - Admissible tempo range (also the KDE grid span)
///
/// # Returns
///
/// One of the 200 grid points spanning the range, or 0.0 when no candidate
/// interval survives
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate
///
/// # Example
///
/// ```no_run
/// use tempo_dsp::config::TempoRange;
/// use tempo_dsp::features::period::density::estimate_bpm_density;
///
/// let samples = vec![0.0f32; 44100 * 10];
/// let bpm = estimate_bpm_density(&samples, 44100, &TempoRange::default())?;
/// # Ok::<(), tempo_dsp::AnalysisError>(())
/// ```
pub fn estimate_bpm_density(
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
        log::debug!("Energy density: silent input, no detection");
        return Ok(0.0);
    };

    let Some(flux) = windowed_energy_flux(&normalized, FRAME_SIZE, HOP_SIZE)? else {
        return Ok(0.0);
    };

    let threshold = dynamic_threshold(&flux, THRESHOLD_K)?;
    let min_distance = (MIN_PEAK_SPACING_SECONDS * sample_rate as f64 / HOP_SIZE as f64) as usize;
    let peaks = find_peaks(&flux, Some(threshold), min_distance);

    if peaks.len() < 2 {
        log::debug!(
            "Energy density: {} peaks above threshold {:.4}, need at least 2",
            peaks.len(),
            threshold
        );
        return Ok(0.0);
    }

    let candidates: Vec<f64> = consecutive_intervals(&peak_times(&peaks, HOP_SIZE, sample_rate))
        .into_iter()
        .map(|interval| 60.0 / interval)
        .filter(|&bpm| range.contains(bpm as f32))
        .collect();

    if candidates.is_empty() {
        log::debug!("Energy density: no interval inside the tempo range");
        return Ok(0.0);
    }

    let grid = linspace(range.min_bpm() as f64, range.max_bpm() as f64, GRID_POINTS);
    let Some(bpm) = densest_grid_point(&candidates, &grid) else {
        return Ok(0.0);
    };

    log::debug!(
        "Energy density: {} peaks, {} candidates -> {:.2} BPM",
        peaks.len(),
        candidates.len(),
        bpm
    );

    Ok(bpm as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `sin(2π·f·t) + 0.5·sin(4π·f·t)` with `f = bpm / 60`
    fn harmonic_beat(bpm: f64, sample_rate: u32, seconds: f64) -> Vec<f32> {
        let n = (sample_rate as f64 * seconds) as usize;
        let f = bpm / 60.0;
        (0..n)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                ((2.0 * std::f64::consts::PI * f * t).sin()
                    + 0.5 * (4.0 * std::f64::consts::PI * f * t).sin()) as f32
            })
            .collect()
    }

    #[test]
    fn test_linspace() {
        let grid = linspace(92.0, 184.0, 200);
        assert_eq!(grid.len(), 200);
        assert_eq!(grid[0], 92.0);
        assert_eq!(grid[199], 184.0);
        assert!((grid[1] - grid[0] - 92.0 / 199.0).abs() < 1e-12);

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 5.0, 1), vec![3.0]);
    }

    #[test]
    fn test_kde_scott_bandwidth() {
        // Sample variance of [1, 2, 3, 4] is 5/3
        let kde = GaussianKde::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let expected = (5.0f64 / 3.0 * 4.0f64.powf(-0.4)).sqrt();
        assert!((kde.bandwidth() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let kde = GaussianKde::new(&[120.0, 121.0, 125.0]).unwrap();
        let grid = linspace(80.0, 170.0, 9001);
        let step = grid[1] - grid[0];
        let integral: f64 = grid.iter().map(|&x| kde.evaluate(x) * step).sum();
        assert!((integral - 1.0).abs() < 1e-3, "integral {}", integral);
    }

    #[test]
    fn test_kde_degenerate_inputs() {
        assert!(GaussianKde::new(&[]).is_err());
        assert!(GaussianKde::new(&[120.0]).is_err());
        assert!(GaussianKde::new(&[120.0, 120.0, 120.0]).is_err());
    }

    #[test]
    fn test_densest_grid_point_follows_cluster() {
        let grid = linspace(92.0, 184.0, 200);
        let candidates = vec![127.5, 128.0, 128.3, 128.1, 170.0];
        let best = densest_grid_point(&candidates, &grid).unwrap();
        assert!((best - 128.0).abs() < 1.5, "got {}", best);
    }

    #[test]
    fn test_densest_grid_point_single_candidate() {
        let grid = linspace(92.0, 184.0, 200);
        let best = densest_grid_point(&[130.0], &grid).unwrap();
        assert!((best - 130.0).abs() <= 92.0 / 199.0 / 2.0 + 1e-9);
        assert!(grid.contains(&best));
        assert!(densest_grid_point(&[], &grid).is_none());
    }

    #[test]
    fn test_densest_grid_point_rounding_noise() {
        // Peaks exactly 43 hops apart: candidates differ only by rounding noise
        let peaks: Vec<usize> = (0..19).map(|k| 40 + 43 * k).collect();
        let candidates: Vec<f64> = consecutive_intervals(&peak_times(&peaks, HOP_SIZE, 44100))
            .into_iter()
            .map(|interval| 60.0 / interval)
            .collect();
        let expected = 60.0 * 44100.0 / (43.0 * HOP_SIZE as f64);

        let grid = linspace(92.0, 184.0, GRID_POINTS);
        let step = grid[1] - grid[0];
        let best = densest_grid_point(&candidates, &grid).unwrap();
        assert!(
            (best - expected).abs() <= step / 2.0 + 1e-9,
            "expected grid point near {:.3}, got {:.3}",
            expected,
            best
        );
    }

    #[test]
    fn test_densest_grid_point_vanishing_density() {
        // Bandwidth passes the step check but every grid density underflows
        let grid = linspace(92.0, 184.0, GRID_POINTS);
        let step = grid[1] - grid[0];
        let best = densest_grid_point(&[120.0, 120.001], &grid).unwrap();
        assert!((best - 120.0005).abs() <= step / 2.0 + 1e-9, "got {:.3}", best);
    }

    #[test]
    fn test_density_harmonic_beat() {
        let range = TempoRange::default();
        for bpm_true in [110.0, 128.0] {
            let samples = harmonic_beat(bpm_true, 44100, 10.0);
            let bpm = estimate_bpm_density(&samples, 44100, &range).unwrap();
            assert!(
                (bpm - bpm_true as f32).abs() <= 2.0,
                "expected ~{} BPM, got {:.2}",
                bpm_true,
                bpm
            );
        }
    }

    #[test]
    fn test_density_click_train_whole_hops() {
        let period = 43 * HOP_SIZE;
        let mut samples = vec![0.0f32; 44100 * 10];
        for start in (0..samples.len()).step_by(period) {
            for (i, s) in samples[start..].iter_mut().take(1500).enumerate() {
                *s = (1.0 - i as f32 / 1500.0) * if i % 2 == 0 { 0.9 } else { -0.9 };
            }
        }

        let range = TempoRange::default();
        let bpm = estimate_bpm_density(&samples, 44100, &range).unwrap();
        let expected = (60.0 * 44100.0 / period as f64) as f32;
        let step = (range.max_bpm() - range.min_bpm()) / (GRID_POINTS - 1) as f32;
        assert!(
            (bpm - expected).abs() <= step / 2.0 + 1e-3,
            "expected ~{:.2} BPM, got {:.2}",
            expected,
            bpm
        );
    }

    #[test]
    fn test_density_silence() {
        let bpm = estimate_bpm_density(&vec![0.0f32; 44100 * 3], 44100, &TempoRange::default())
            .unwrap();
        assert_eq!(bpm, 0.0);
    }

    #[test]
    fn test_density_result_on_grid() {
        let mut samples = vec![0.0f32; 44100 * 6];
        let period = 44100 / 2;
        for start in (0..samples.len()).step_by(period) {
            for (i, s) in samples[start..].iter_mut().take(2000).enumerate() {
                *s = (1.0 - i as f32 / 2000.0) * if i % 2 == 0 { 1.0 } else { -1.0 };
            }
        }
        let range = TempoRange::default();
        let bpm = estimate_bpm_density(&samples, 44100, &range).unwrap();
        assert!(bpm > 0.0);
        let grid = linspace(range.min_bpm() as f64, range.max_bpm() as f64, GRID_POINTS);
        assert!(grid.iter().any(|&g| (g as f32 - bpm).abs() < 1e-4));
    }
}
