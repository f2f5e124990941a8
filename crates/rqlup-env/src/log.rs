//! Quiet-mode aware progress logging. When RQLUP_QUIET=1, step progress is suppressed.
//! Uses `tracing::info!` so output is captured by the tracing subscriber.

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        if !$crate::log::is_quiet() {
            tracing::info!($($arg)*);
        }
    }};
}

pub fn is_quiet() -> bool {
    rqlup_core::config::ObservabilityConfig::from_env().quiet
}
