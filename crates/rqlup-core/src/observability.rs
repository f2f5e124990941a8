//! Observability: tracing init.
//!
//! Uses config::ObservabilityConfig for RQLUP_QUIET, RQLUP_LOG_LEVEL, RQLUP_LOG_JSON.
//! Everything is written to stderr: the launcher shares stdout with the
//! delegated `rql` process and must never write to it.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::{ObservabilityConfig, DEFAULT_LAUNCH_LOG_LEVEL, DEFAULT_PROVISION_LOG_LEVEL};

/// Tracing initialization mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingMode {
    /// `rqlup` subcommands: step progress at info.
    Provision,
    /// `rql` launcher: warnings only, so a normal launch adds no output.
    Launch,
}

impl TracingMode {
    fn default_level(self) -> &'static str {
        match self {
            TracingMode::Provision => DEFAULT_PROVISION_LOG_LEVEL,
            TracingMode::Launch => DEFAULT_LAUNCH_LOG_LEVEL,
        }
    }
}

/// Initialize tracing. Call once at process startup.
/// `RUST_LOG` wins over `RQLUP_LOG_LEVEL` when set.
pub fn init_tracing(mode: TracingMode) {
    let cfg = ObservabilityConfig::from_env();
    let level = cfg.filter_for(mode.default_level());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}
