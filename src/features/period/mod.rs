//! Period estimation modules
//!
//! Convert onset curves to a tempo using:
//! - Autocorrelation of the onset-strength envelope
//! - Median inter-onset interval of spectral-flux peaks
//! - Kernel density of windowed-energy-flux intervals

pub mod autocorrelation;
pub mod density;
pub mod intervals;
pub mod peak_picking;
