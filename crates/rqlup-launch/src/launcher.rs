//! Delegate an invocation to `python -m rql` inside the provisioned venv.
//!
//! No flag parsing happens here: every argument is forwarded verbatim, in
//! order, behind the fixed `-m rql` prefix. Stdio is inherited so prompts,
//! terminal rendering and pipes behave as if rql had been started directly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use rqlup_core::layout::{RQL_MODULE, VENDOR_DIR};
use rqlup_core::{BootstrapError, CommandSpec, InstallLayout, Result, Termination};

use crate::signal::InteractiveSignalGuard;

/// Find the installation root for a launcher executable living in `exe_dir`.
///
/// The nearest ancestor (including `exe_dir` itself) that holds a `vendor/`
/// directory wins. Without one, the root is `exe_dir`, or its parent when
/// `exe_dir` is a `bin` directory; validation then reports the missing
/// interpreter under that root.
pub fn locate_root(exe_dir: &Path) -> PathBuf {
    if let Some(found) = exe_dir
        .ancestors()
        .find(|dir| dir.join(VENDOR_DIR).is_dir())
    {
        return found.to_path_buf();
    }
    match (exe_dir.file_name(), exe_dir.parent()) {
        (Some(name), Some(parent)) if name == "bin" => parent.to_path_buf(),
        _ => exe_dir.to_path_buf(),
    }
}

/// Launcher bound to one installation.
#[derive(Debug, Clone)]
pub struct Launcher {
    layout: InstallLayout,
}

impl Launcher {
    pub fn new(layout: InstallLayout) -> Self {
        Self { layout }
    }

    /// Launcher for the installation the running executable belongs to.
    /// Symlinks to the executable are resolved first.
    pub fn from_current_exe() -> Result<Self> {
        let exe = std::env::current_exe()
            .and_then(|p| p.canonicalize())
            .map_err(|e| BootstrapError::io("locate launcher executable", e))?;
        let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
        let root = locate_root(exe_dir);
        tracing::debug!(exe = %exe.display(), root = %root.display(), "resolved installation root");
        Ok(Self::new(InstallLayout::new(root)))
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Path of the environment interpreter. Not checked.
    pub fn interpreter(&self) -> PathBuf {
        self.layout.venv_python()
    }

    /// The interpreter path, or `MissingInterpreter` when it is absent.
    pub fn validate(&self) -> Result<PathBuf> {
        let python = self.interpreter();
        if python.exists() {
            Ok(python)
        } else {
            Err(BootstrapError::MissingInterpreter { path: python })
        }
    }

    /// Validated command line: `<venv python> -m rql <args...>`.
    pub fn command<I, S>(&self, args: I) -> Result<CommandSpec>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let python = self.validate()?;
        Ok(delegated_command(python, args))
    }

    /// Start the child, wait for it, and report how it ended.
    ///
    /// Never starts anything when the interpreter is missing.
    pub fn delegate<I, S>(&self, args: I) -> Result<Termination>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let spec = self.command(args)?;
        tracing::debug!(cmd = %spec, "delegating");
        let guard = InteractiveSignalGuard::install();
        let mut command = spec.to_command();
        guard.restore_in_child(&mut command);
        let mut child = command.spawn().map_err(|source| BootstrapError::Spawn {
            program: spec.program_display(),
            source,
        })?;

        let status = child
            .wait()
            .map_err(|e| BootstrapError::io("wait for rql", e))?;
        drop(guard);
        let termination = Termination::from(status);
        tracing::debug!(%termination, "rql finished");
        Ok(termination)
    }
}

/// `<python> -m rql` followed by `args`, untouched.
pub fn delegated_command<I, S>(python: impl Into<OsString>, args: I) -> CommandSpec
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    CommandSpec::new(python).args(["-m", RQL_MODULE]).args(args)
}
