//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio for analysis:
//! - Channel mixing (multi-channel to mono)
//! - Peak normalization with a silence guard

pub mod channel_mixer;
pub mod normalization;
