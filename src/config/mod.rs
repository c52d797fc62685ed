//! Engine Configuration Module
//!
//! Operator-tunable defaults loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `WELLPERF_CONFIG` environment variable (path to TOML file)
//! 2. `wellperf.toml` in the current working directory
//! 3. Built-in defaults (`config::defaults`)
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(EngineConfig::load());
//!
//! // Anywhere else:
//! let joint = config::get().string.average_joint_length;
//! ```
//!
//! Library code that can run before `init()` (unit tests, embedding callers)
//! goes through `config::current()`, which falls back to defaults.

mod engine_config;
pub mod defaults;
pub mod validation;

pub use engine_config::*;

use std::sync::OnceLock;

static ENGINE_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Initialize the global engine configuration. Later calls are ignored.
pub fn init(config: EngineConfig) {
    if ENGINE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the global engine configuration.
///
/// Panics if `init()` has not been called; a missing config is a startup bug.
#[allow(clippy::expect_used)]
pub fn get() -> &'static EngineConfig {
    ENGINE_CONFIG
        .get()
        .expect("config::get() called before config::init(), this is a startup bug")
}

pub fn is_initialized() -> bool {
    ENGINE_CONFIG.get().is_some()
}

/// The global configuration if initialized, otherwise built-in defaults.
pub fn current() -> EngineConfig {
    ENGINE_CONFIG.get().cloned().unwrap_or_default()
}
