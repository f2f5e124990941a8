//! `rqlup` subcommands.
//!
//!   install    — provision vendor/venv and install rql (the default)
//!   status     — report installation state
//!   clean      — remove vendor/venv
//!   candidates — probe interpreter candidates

pub mod candidates;
pub mod clean;
pub mod install;
pub mod status;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Absolute, symlink-free installation root. Child steps run with it as
/// working directory, so relative paths must not leak into them.
pub(crate) fn resolve_root(root: &Path) -> Result<PathBuf> {
    root.canonicalize()
        .with_context(|| format!("Installation root {} is not accessible", root.display()))
}
