//! Shared utilities for the BMV dashboard
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup, TOML configuration loading and environment overrides.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_override, load_toml, parse_toml};
pub use logging::{DEFAULT_FILTER, init_tracing, init_tracing_with};
