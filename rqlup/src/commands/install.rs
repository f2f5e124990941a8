//! `rqlup install` — provision the environment and install rql.

use anyhow::{anyhow, Result};
use std::path::Path;

use rqlup_core::{InstallLayout, SystemRunner};
use rqlup_env::{Candidate, ProvisionOptions, Provisioner};

use super::resolve_root;
use crate::TAG;

/// `rqlup install [--root DIR] [--python CMD] [--skip-upgrade]`
pub fn cmd_install(root: &Path, python: Option<&str>, skip_upgrade: bool) -> Result<()> {
    let layout = InstallLayout::new(resolve_root(root)?);
    let interpreter = python
        .map(|p| Candidate::parse(p).ok_or_else(|| anyhow!("--python must name an interpreter")))
        .transpose()?;
    let opts = ProvisionOptions {
        interpreter,
        skip_upgrade,
    };

    eprintln!("{TAG} installing rql into {}", layout.venv_dir().display());
    let report = Provisioner::new(&layout, &SystemRunner).run(&opts)?;

    if !report.created_venv {
        eprintln!(
            "{TAG} reused existing environment (run \"rqlup clean\" to rebuild it)"
        );
    }
    eprintln!(
        "{TAG} ✓ rql installed with Python {} ({})",
        report.interpreter.version, report.interpreter.candidate
    );
    eprintln!("{TAG} interpreter: {}", report.venv_python.display());
    Ok(())
}
