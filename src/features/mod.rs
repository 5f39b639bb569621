//! Feature extraction modules
//!
//! This module contains the signal-analysis building blocks:
//! - Spectrum (windows, FFT frames, STFT)
//! - Onset curves (onset strength, spectral flux, windowed energy flux)
//! - Period estimation (BPM detection)

pub mod onset;
pub mod period;
pub mod spectrum;
