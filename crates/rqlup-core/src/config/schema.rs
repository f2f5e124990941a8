//! Structured configuration loaded from the environment.

use super::env_keys::observability as obv_keys;
use super::loader::{env_bool, env_optional};

/// Default filter when nothing is configured and the provisioner is running.
pub const DEFAULT_PROVISION_LOG_LEVEL: &str = "rqlup=info";

/// Default filter for the launcher: stay silent unless something is wrong.
pub const DEFAULT_LAUNCH_LOG_LEVEL: &str = "rqlup=warn";

/// Observability config: quiet, log_level, log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    /// Explicit filter from `RQLUP_LOG_LEVEL`; `None` means "use the mode default".
    pub log_level: Option<String>,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(Self::load)
    }

    fn load() -> Self {
        let quiet = env_bool(obv_keys::RQLUP_QUIET, obv_keys::QUIET_ALIASES, false);
        let log_level = env_optional(obv_keys::RQLUP_LOG_LEVEL, obv_keys::LOG_LEVEL_ALIASES);
        let log_json = env_bool(obv_keys::RQLUP_LOG_JSON, obv_keys::LOG_JSON_ALIASES, false);
        Self {
            quiet,
            log_level,
            log_json,
        }
    }

    /// Resolve the effective filter directive given the mode default.
    pub fn filter_for(&self, mode_default: &str) -> String {
        if self.quiet {
            return "rqlup=warn".to_string();
        }
        self.log_level
            .clone()
            .unwrap_or_else(|| mode_default.to_string())
    }
}
