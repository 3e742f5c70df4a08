//! Shared building blocks for the vsquery workspace
//!
//! Platform defaults live in [`constants`]; [`logging`] wires up
//! `tracing-subscriber` for the binary.

pub mod constants;
pub mod logging;

pub use constants::*;
