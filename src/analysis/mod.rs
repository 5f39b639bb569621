//! Analysis and result aggregation modules
//!
//! Combines the per-algorithm tempo estimates into the final result:
//! - Detector (runs every algorithm, isolates failures)
//! - Confidence scoring
//! - Result types

pub mod confidence;
pub mod detector;
pub mod result;
