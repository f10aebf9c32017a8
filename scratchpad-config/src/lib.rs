//! Configuration system for the scratchpad editor.
//!
//! This crate provides configuration loading, saving, and default values
//! for the tab/session engine. It includes:
//!
//! - The `Config` struct and its YAML persistence
//! - Default value functions used by serde
//! - Log level selection for the debug log
//! - Typed configuration errors

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::LogLevel;
