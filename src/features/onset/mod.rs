//! Onset detection modules
//!
//! Curves whose peaks mark onsets, one per estimator family:
//! - Onset-strength envelope (mel spectrogram, used by autocorrelation)
//! - Spectral flux between overlapping frames
//! - Windowed energy flux
//!
//! plus the filtering, mel weighting and thresholding they share.

pub mod energy_flux;
pub mod filter;
pub mod mel;
pub mod onset_strength;
pub mod spectral_flux;
pub mod threshold;
