//! Channel mixing utilities (multi-channel to mono conversion)

/// Average interleaved channels into a mono signal
///
/// Every output sample is the arithmetic mean of one frame's channel values.
/// A trailing partial frame is ignored.
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (`L R L R ...` for stereo)
/// * `channels` - Number of channels (0 and 1 return the input unchanged)
///
/// # Returns
///
/// Mono samples
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    log::debug!(
        "Downmixing {} frames of {} channels to mono",
        interleaved.len() / channels,
        channels
    );

    let scale = 1.0 / channels as f32;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo() {
        let mono = downmix_interleaved(&[1.0, 3.0, -1.0, 1.0], 2);
        assert_eq!(mono, vec![2.0, 0.0]);
    }

    #[test]
    fn test_downmix_single_channel_passthrough() {
        let samples = vec![0.25, -0.5, 0.75];
        assert_eq!(downmix_interleaved(&samples, 1), samples);
    }

    #[test]
    fn test_downmix_three_channels_drops_partial_frame() {
        let mono = downmix_interleaved(&[3.0, 0.0, 0.0, 1.0, 1.0, 1.0, 9.0], 3);
        assert_eq!(mono, vec![1.0, 1.0]);
    }
}
