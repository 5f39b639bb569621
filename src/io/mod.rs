//! Audio I/O modules
//!
//! Views over decoded sample data handed in by the host application.
//! Decoding itself lives outside this crate.

pub mod sample_buffer;
