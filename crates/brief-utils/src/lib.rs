//! Shared utilities for market-brief
//!
//! - [`logging`]: tracing subscriber setup
//! - [`config`]: settings read from the environment (and an optional `.env`)

pub mod config;
pub mod logging;

pub use config::{ConfigError, Settings};
pub use logging::{LogFormat, init_tracing};
