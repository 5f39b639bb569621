//! Borrowed views over decoded audio

use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::downmix_interleaved;
use std::borrow::Cow;

/// Decoded audio samples, mono or interleaved multi-channel
///
/// The buffer borrows the caller's data and is never mutated; downmixing
/// produces a new mono buffer.
#[derive(Debug, Clone, Copy)]
pub struct SampleBuffer<'a> {
    /// Sample data (interleaved when `channels > 1`)
    data: &'a [f32],
    /// Number of interleaved channels
    channels: usize,
}

impl<'a> SampleBuffer<'a> {
    /// Wrap a mono signal
    pub fn mono(data: &'a [f32]) -> Self {
        Self { data, channels: 1 }
    }

    /// Wrap interleaved multi-channel samples (`L R L R ...` for stereo)
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `channels` is zero or the
    /// sample count is not a multiple of the channel count.
    pub fn interleaved(data: &'a [f32], channels: usize) -> Result<Self, AnalysisError> {
        if channels == 0 {
            return Err(AnalysisError::InvalidInput(
                "Channel count must be > 0".to_string(),
            ));
        }
        if data.len() % channels != 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "{} samples cannot be split into {} channels",
                data.len(),
                channels
            )));
        }
        Ok(Self { data, channels })
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.data.len() / self.channels
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mono signal: borrowed as-is for a single channel, averaged across channels otherwise
    pub fn to_mono(&self) -> Cow<'a, [f32]> {
        if self.channels == 1 {
            Cow::Borrowed(self.data)
        } else {
            Cow::Owned(downmix_interleaved(self.data, self.channels))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_is_borrowed() {
        let data = vec![0.1f32, 0.2, 0.3];
        let buffer = SampleBuffer::mono(&data);
        assert_eq!(buffer.frames(), 3);
        assert!(matches!(buffer.to_mono(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_stereo_downmix() {
        let data = vec![1.0f32, 0.0, 0.5, 0.5, -1.0, 1.0];
        let buffer = SampleBuffer::interleaved(&data, 2).unwrap();
        assert_eq!(buffer.frames(), 3);
        assert_eq!(buffer.to_mono().as_ref(), &[0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_interleaved_validation() {
        let data = vec![0.0f32; 5];
        assert!(SampleBuffer::interleaved(&data, 0).is_err());
        assert!(SampleBuffer::interleaved(&data, 2).is_err());
        assert!(SampleBuffer::interleaved(&data, 5).is_ok());
    }
}
