//! Command-line argument parsing and dispatch

pub mod args;
pub mod commands;
pub mod handlers;

pub use args::Args;
pub use commands::{CacheLocation, Commands, CommonOptions, FeatureOptions, LogoutOptions};
