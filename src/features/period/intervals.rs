//! Inter-onset interval analysis
//!
//! Converts peak positions on a flux curve into beat intervals and estimates
//! tempo from their median.
//!
//! Algorithm:
//! 1. Spectral flux of the raw signal (frame 1024, hop 512, FFT 2048)
//! 2. Peaks at least 0.3 s apart
//! 3. Peak indices → seconds, consecutive intervals
//! 4. `BPM = 60 / median(intervals)`, accepted only inside the range
//!
//! The median keeps a single missed or spurious onset from skewing the estimate.

use super::peak_picking::find_peaks;
use crate::config::TempoRange;
use crate::error::AnalysisError;
use crate::features::onset::spectral_flux::spectral_flux;

/// Analysis frame length in samples
pub const FRAME_SIZE: usize = 1024;

/// Hop between frames in samples
pub const HOP_SIZE: usize = 512;

/// FFT size each frame is zero-padded to
pub const N_FFT: usize = 2048;

/// Minimum spacing between flux peaks in seconds
const MIN_PEAK_SPACING_SECONDS: f64 = 0.3;

/// Convert frame indices to times in seconds
pub fn peak_times(peaks: &[usize], hop_size: usize, sample_rate: u32) -> Vec<f64> {
    peaks
        .iter()
        .map(|&p| (p * hop_size) as f64 / sample_rate as f64)
        .collect()
}

/// Differences between consecutive times
pub fn consecutive_intervals(times: &[f64]) -> Vec<f64> {
    times.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Median of a set of values; an even count averages the two middle values
///
/// Returns `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Estimate BPM from the median interval between spectral-flux peaks
///
/// # Arguments
///
/// * `samples` - Mono audio samples (not normalized)
/// * `sample_rate` - Sample rate in Hz
/// * `range` - Admissible tempo range
///
/// # Returns
///
/// The BPM estimate, or 0.0 when fewer than two peaks are found or the
/// estimate falls outside the range
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate
///
/// # Example
///
/// ```no_run
/// use tempo_dsp::config::TempoRange;
/// use tempo_dsp::features::period::intervals::estimate_bpm_median_interval;
///
/// let samples = vec![0.0f32; 44100 * 10];
/// let bpm = estimate_bpm_median_interval(&samples, 44100, &TempoRange::default())?;
/// # Ok::<(), tempo_dsp::AnalysisError>(())
/// ```
pub fn estimate_bpm_median_interval(
    samples: &[f32],
    sample_rate: u32,
    range: &TempoRange,
) -> Result<f32, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    let flux = spectral_flux(samples, FRAME_SIZE, HOP_SIZE, N_FFT)?;

    let min_distance = (MIN_PEAK_SPACING_SECONDS * sample_rate as f64 / HOP_SIZE as f64) as usize;
    let peaks = find_peaks(&flux, None, min_distance);

    if peaks.len() < 2 {
        log::debug!(
            "Spectral flux: {} peaks, need at least 2 for interval analysis",
            peaks.len()
        );
        return Ok(0.0);
    }

    let intervals = consecutive_intervals(&peak_times(&peaks, HOP_SIZE, sample_rate));
    let Some(median_interval) = median(&intervals) else {
        return Ok(0.0);
    };

    if median_interval <= 0.0 {
        return Err(AnalysisError::NumericalError(format!(
            "Non-positive median interval: {}",
            median_interval
        )));
    }

    let bpm = (60.0 / median_interval) as f32;

    log::debug!(
        "Spectral flux: {} peaks, median interval {:.4}s -> {:.2} BPM",
        peaks.len(),
        median_interval,
        bpm
    );

    if range.contains(bpm) {
        Ok(bpm)
    } else {
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sinusoid plus second harmonic at the beat frequency
    fn harmonic_beat(bpm: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        let f = bpm as f64 / 60.0;
        (0..n)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                let x = (2.0 * std::f64::consts::PI * f * t).sin()
                    + 0.5 * (4.0 * std::f64::consts::PI * f * t).sin();
                x as f32
            })
            .collect()
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_resists_outlier() {
        let intervals = vec![0.5, 0.5, 0.5, 2.0, 0.5];
        assert_eq!(median(&intervals), Some(0.5));
    }

    #[test]
    fn test_peak_times_and_intervals() {
        let times = peak_times(&[0, 43, 86], 512, 22016);
        assert!((times[1] - 1.0).abs() < 1e-12);
        let intervals = consecutive_intervals(&times);
        assert_eq!(intervals.len(), 2);
        assert!((intervals[0] - 1.0).abs() < 1e-12);
        assert!((intervals[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_median_interval_harmonic_beat() {
        let samples = harmonic_beat(128.0, 44100, 10.0);
        let bpm = estimate_bpm_median_interval(&samples, 44100, &TempoRange::default()).unwrap();
        assert!(
            (126.0..=130.0).contains(&bpm),
            "expected ~128 BPM, got {:.2}",
            bpm
        );
    }

    #[test]
    fn test_median_interval_tempo_sweep() {
        let range = TempoRange::default();
        for bpm_true in [100.0, 110.0, 120.0, 140.0, 150.0] {
            let samples = harmonic_beat(bpm_true, 44100, 10.0);
            let bpm = estimate_bpm_median_interval(&samples, 44100, &range).unwrap();
            assert!(
                (bpm - bpm_true).abs() <= 2.0,
                "expected ~{} BPM, got {:.2}",
                bpm_true,
                bpm
            );
        }
    }

    #[test]
    fn test_median_interval_out_of_range_is_no_detection() {
        let samples = harmonic_beat(128.0, 44100, 10.0);
        let range = TempoRange::new(60.0, 90.0).unwrap();
        assert_eq!(
            estimate_bpm_median_interval(&samples, 44100, &range).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_median_interval_silence() {
        let bpm =
            estimate_bpm_median_interval(&vec![0.0f32; 44100 * 3], 44100, &TempoRange::default())
                .unwrap();
        assert_eq!(bpm, 0.0);
    }

    #[test]
    fn test_median_interval_short_buffer() {
        let bpm = estimate_bpm_median_interval(&[0.3f32; 900], 44100, &TempoRange::default())
            .unwrap();
        assert_eq!(bpm, 0.0);
    }
}
