//! Common utilities shared across the credential crates.
//!
//! This crate provides:
//! - Unified error handling
//! - Environment-driven configuration helpers
//! - Tracing setup

pub mod config;
pub mod error;
pub mod logging;

pub use config::{env_var_name, properties_from_env, properties_from_lookup};
pub use error::{AppError, AppResult, OptionExt};
pub use logging::init_tracing;
