//! Ambient configuration layer.
//!
//! All environment reads for rqlup's own diagnostics go through this module.
//!
//! - `loader`: env_optional, env_bool helpers
//! - `schema`: ObservabilityConfig
//! - `env_keys`: key constants and aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional};
pub use schema::{ObservabilityConfig, DEFAULT_LAUNCH_LOG_LEVEL, DEFAULT_PROVISION_LOG_LEVEL};
