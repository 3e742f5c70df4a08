//! Command handlers for the vsquery CLI

pub mod auth;
pub mod resources;
pub mod version;
