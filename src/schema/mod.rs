//! Schema module - Configuration and seed types for analysis runs.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
