//! The `rql` launcher: forwards every invocation to `python -m rql` inside
//! `vendor/venv` and terminates the way the child terminated.

pub mod launcher;
pub mod signal;

pub use launcher::{delegated_command, locate_root, Launcher};
pub use signal::propagate;

/// Tests that spawn children or touch signal dispositions run one at a time.
#[cfg(test)]
pub(crate) static TEST_SIGNAL_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
