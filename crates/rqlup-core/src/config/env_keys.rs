//! Environment variable keys read by the ambient logging layer.
//!
//! Primary variables use the `RQLUP_*` prefix. Aliases are only consulted when
//! the primary key is unset. None of these keys affect provisioning or
//! delegation, and none are written back into the environment handed to the
//! delegated `rql` process.

/// Observability and logging
pub mod observability {
    pub const RQLUP_QUIET: &str = "RQLUP_QUIET";
    pub const QUIET_ALIASES: &[&str] = &["RQL_INSTALL_QUIET"];

    pub const RQLUP_LOG_LEVEL: &str = "RQLUP_LOG_LEVEL";
    pub const LOG_LEVEL_ALIASES: &[&str] = &["RQL_INSTALL_LOG_LEVEL"];

    pub const RQLUP_LOG_JSON: &str = "RQLUP_LOG_JSON";
    pub const LOG_JSON_ALIASES: &[&str] = &[];
}
