//! # vsquery CLI
//!
//! Command-line interface for the Viessmann IoT platform. Authenticates
//! against the Viessmann IAM and prints the raw JSON of the installations
//! and features resources.
//!
//! ## Architecture
//!
//! - Clap-based argument parsing with derive macros
//! - Handler-based command processing
//! - Layered configuration (defaults, TOML file, environment, flags)
//! - Authentication and HTTP through `vsquery-sdk`

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::*;
pub use error::*;
