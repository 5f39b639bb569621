//! Peak detection utilities
//!
//! Finds local maxima in 1-D signals (autocorrelation functions, flux curves)
//! with an optional minimum height and a minimum spacing between accepted peaks.

/// Find peaks in a signal
///
/// A peak is a sample strictly greater than its left neighbour whose right side
/// eventually drops below it. Flat tops report their middle index (the lower
/// middle for even widths). The first and last samples are never peaks.
///
/// # Arguments
///
/// * `signal` - Signal to find peaks in
/// * `height` - Optional minimum peak value (inclusive)
/// * `min_distance` - Minimum distance between accepted peaks in samples
///   (values below 1 behave like 1)
///
/// # Returns
///
/// Peak indices in ascending order
///
/// # Algorithm
///
/// 1. Find all local maxima (plateau-aware)
/// 2. Filter by height
/// 3. Enforce minimum distance: visit peaks from highest to lowest (later index
///    first on ties); each surviving peak removes every other peak closer than
///    `min_distance`
///
/// # Example
///
/// ```
/// use tempo_dsp::features::period::peak_picking::find_peaks;
///
/// let signal = vec![0.0, 0.5, 1.0, 0.7, 0.3, 0.9, 0.2];
/// assert_eq!(find_peaks(&signal, None, 1), vec![2, 5]);
/// assert_eq!(find_peaks(&signal, None, 4), vec![2]);
/// assert_eq!(find_peaks(&signal, Some(0.95), 1), vec![2]);
/// ```
pub fn find_peaks(signal: &[f32], height: Option<f32>, min_distance: usize) -> Vec<usize> {
    let mut peaks = local_maxima(signal);

    if let Some(h) = height {
        peaks.retain(|&i| signal[i] >= h);
    }

    let distance = min_distance.max(1);
    if distance > 1 && peaks.len() > 1 {
        peaks = select_by_distance(signal, &peaks, distance);
    }

    log::debug!(
        "Found {} peaks in signal of length {} (height={:?}, min_distance={})",
        peaks.len(),
        signal.len(),
        height,
        distance
    );

    peaks
}

/// Plateau-aware local maxima, excluding the end points
fn local_maxima(signal: &[f32]) -> Vec<usize> {
    let n = signal.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }

    let mut i = 1;
    let last = n - 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                let left = i;
                let right = ahead - 1;
                peaks.push((left + right) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

/// Keep the highest peaks so that no two survivors are closer than `distance`
fn select_by_distance(signal: &[f32], peaks: &[usize], distance: usize) -> Vec<usize> {
    // Priority order: ascending height, ties by ascending position; visited from the end
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| {
        signal[peaks[a]]
            .partial_cmp(&signal[peaks[b]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = vec![true; peaks.len()];
    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }

        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }

        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}
