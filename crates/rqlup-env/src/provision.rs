//! Provision the isolated environment and install the rql package into it.
//!
//! The pipeline is strictly sequential and stops at the first failure:
//!
//! 1. discover (or validate) an interpreter >= 3.11
//! 2. ensure `vendor/` exists
//! 3. create `vendor/venv` with `python -m venv`, unless the directory exists
//! 4. upgrade pip / setuptools / wheel inside the venv
//! 5. `pip install .` from the installation root
//!
//! Nothing is rolled back. A venv left behind by a failed step 4 or 5 is
//! reused as-is by the next run (see `rqlup status` / `rqlup clean`).

use std::path::PathBuf;

use rqlup_core::{BootstrapError, CommandRunner, CommandSpec, InstallLayout, Result, Termination};
use serde::Serialize;

use crate::info_log;
use crate::interpreter::{candidates_for, Candidate, InterpreterFinder, SelectedInterpreter};

/// Packages upgraded before installing rql.
pub const TOOLCHAIN_PACKAGES: &[&str] = &["pip", "setuptools", "wheel"];

/// Caller-controlled knobs for one provisioning run.
#[derive(Debug, Clone, Default)]
pub struct ProvisionOptions {
    /// Use this interpreter instead of searching the candidate list.
    pub interpreter: Option<Candidate>,
    /// Skip the pip/setuptools/wheel upgrade step.
    pub skip_upgrade: bool,
}

/// What a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub interpreter: SelectedInterpreter,
    /// False when `vendor/venv` already existed and creation was skipped.
    pub created_venv: bool,
    pub upgraded_toolchain: bool,
    pub venv_python: PathBuf,
}

/// Runs the provisioning pipeline against one [`InstallLayout`].
pub struct Provisioner<'a, R: CommandRunner + ?Sized> {
    layout: &'a InstallLayout,
    runner: &'a R,
    candidates: Vec<Candidate>,
    check_path: bool,
}

impl<'a, R: CommandRunner + ?Sized> Provisioner<'a, R> {
    /// `layout` should have an absolute root: later steps run with the root as
    /// working directory and start the venv interpreter by path.
    pub fn new(layout: &'a InstallLayout, runner: &'a R) -> Self {
        Self {
            layout,
            runner,
            candidates: candidates_for(layout.platform()),
            check_path: true,
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn without_path_check(mut self) -> Self {
        self.check_path = false;
        self
    }

    fn finder(&self) -> InterpreterFinder<'a, R> {
        let finder = InterpreterFinder::new(self.runner);
        if self.check_path {
            finder
        } else {
            finder.without_path_check()
        }
    }

    /// Run every step in order.
    pub fn run(&self, opts: &ProvisionOptions) -> Result<ProvisionReport> {
        let interpreter = self.select_interpreter(opts)?;
        self.ensure_vendor_dir()?;
        let created_venv = self.create_venv(&interpreter)?;
        if opts.skip_upgrade {
            info_log!("skipping toolchain upgrade");
        } else {
            self.upgrade_toolchain()?;
        }
        self.install_package()?;
        Ok(ProvisionReport {
            interpreter,
            created_venv,
            upgraded_toolchain: !opts.skip_upgrade,
            venv_python: self.layout.venv_python(),
        })
    }

    /// Discover an interpreter, or validate the one given in `opts`.
    pub fn select_interpreter(&self, opts: &ProvisionOptions) -> Result<SelectedInterpreter> {
        let finder = self.finder();
        match opts.interpreter {
            Some(ref c) => finder.require(c),
            None => finder.discover(&self.candidates),
        }
    }

    /// Create `vendor/` (and parents) if missing.
    pub fn ensure_vendor_dir(&self) -> Result<()> {
        let vendor = self.layout.vendor_dir();
        std::fs::create_dir_all(&vendor)
            .map_err(|e| BootstrapError::io(format!("create {}", vendor.display()), e))
    }

    /// Create the venv unless its directory exists. Returns whether it ran.
    ///
    /// An existing directory is trusted even if it is broken.
    pub fn create_venv(&self, interpreter: &SelectedInterpreter) -> Result<bool> {
        let venv = self.layout.venv_dir();
        if venv.exists() {
            info_log!("environment already exists at {}, skipping creation", venv.display());
            return Ok(false);
        }

        info_log!(
            "creating environment at {} with {} (Python {})",
            venv.display(),
            interpreter.candidate,
            interpreter.version
        );
        let spec = interpreter
            .candidate
            .command([std::ffi::OsString::from("-m"), "venv".into(), venv.clone().into()])
            .current_dir(self.layout.root());
        match self.runner.run(&spec)? {
            t if t.success() => Ok(true),
            Termination::Exited(status) => Err(BootstrapError::VenvCreation { path: venv, status }),
            Termination::Signaled(sig) => {
                tracing::warn!(signal = sig, "venv creation was killed by a signal");
                Err(BootstrapError::VenvCreation {
                    path: venv,
                    status: rqlup_core::error::FAILURE_EXIT_CODE,
                })
            }
        }
    }

    fn venv_pip(&self) -> CommandSpec {
        CommandSpec::new(self.layout.venv_python())
            .args(["-m", "pip", "install"])
            .current_dir(self.layout.root())
    }

    /// `python -m pip install --upgrade pip setuptools wheel` inside the venv.
    pub fn upgrade_toolchain(&self) -> Result<()> {
        info_log!("upgrading {}", TOOLCHAIN_PACKAGES.join(", "));
        let spec = self
            .venv_pip()
            .arg("--upgrade")
            .args(TOOLCHAIN_PACKAGES.iter().copied());
        self.run_step(&spec)
            .map_err(|detail| BootstrapError::ToolchainUpgrade { detail })
    }

    /// `python -m pip install .` from the installation root.
    pub fn install_package(&self) -> Result<()> {
        info_log!("installing rql from {}", self.layout.root().display());
        let spec = self.venv_pip().arg(".");
        self.run_step(&spec)
            .map_err(|detail| BootstrapError::PackageInstall { detail })
    }

    /// Run a venv step; any failure becomes a description for the step error.
    fn run_step(&self, spec: &CommandSpec) -> std::result::Result<(), String> {
        match self.runner.run(spec) {
            Ok(t) if t.success() => Ok(()),
            Ok(t) => Err(t.to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}
