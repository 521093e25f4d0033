//! APM Core - configuration and shared types
//!
//! Holds the persisted user configuration (including the installed SDK
//! version marker) and the error type shared by the other crates.

pub mod config;
pub mod error;

pub use config::{AppConfig, InstalledVersionStore};
pub use error::{ApmError, Result};

/// APM version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "APM";
