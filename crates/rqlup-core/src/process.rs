//! Child process seam.
//!
//! Every child the provisioner starts goes through [`CommandRunner`], so the
//! provisioning pipeline can be driven by a scripted runner in tests. The
//! system implementation inherits stdio for steps (live progress) and captures
//! stdout only for version probes.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{BootstrapError, Result};

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Normal exit with a status code.
    Exited(i32),
    /// Killed by a signal (Unix only).
    Signaled(i32),
}

impl Termination {
    pub fn success(&self) -> bool {
        matches!(self, Termination::Exited(0))
    }

    /// Exit status to report for this termination when it cannot be
    /// re-delivered as a signal. Follows the shell convention `128 + signal`.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Termination::Exited(code) => code,
            Termination::Signaled(sig) => 128 + sig,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit status {code}"),
            Termination::Signaled(sig) => write!(f, "killed by signal {sig}"),
        }
    }
}

impl From<ExitStatus> for Termination {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Termination::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(sig) = status.signal() {
                return Termination::Signaled(sig);
            }
        }
        // No code and no signal: treat as a clean exit.
        Termination::Exited(0)
    }
}

/// A command line plus optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program_display(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Argument list as lossy strings (for logs and test assertions).
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for a in &self.args {
            write!(f, " {}", quote(a))?;
        }
        Ok(())
    }
}

fn quote(s: &OsStr) -> String {
    let s = s.to_string_lossy();
    if s.is_empty() || s.contains(char::is_whitespace) {
        format!("\"{}\"", s)
    } else {
        s.into_owned()
    }
}

/// Extension point for starting child processes.
pub trait CommandRunner {
    /// Run a short read-only command and return its trimmed stdout when it
    /// exits successfully. Any failure (absent binary, spawn error, non-zero
    /// status, non-UTF-8 output) yields `None`.
    fn probe(&self, spec: &CommandSpec) -> Option<String>;

    /// Run a command with inherited stdio and wait for it. `Err` only when the
    /// process could not be started.
    fn run(&self, spec: &CommandSpec) -> Result<Termination>;
}

/// `std::process::Command` backed runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn probe(&self, spec: &CommandSpec) -> Option<String> {
        let out = spec
            .to_command()
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();
        match out {
            Ok(out) if out.status.success() => String::from_utf8(out.stdout)
                .ok()
                .map(|s| s.trim().to_string()),
            Ok(out) => {
                tracing::debug!(cmd = %spec, status = ?out.status, "probe exited unsuccessfully");
                None
            }
            Err(e) => {
                tracing::debug!(cmd = %spec, error = %e, "probe could not start");
                None
            }
        }
    }

    fn run(&self, spec: &CommandSpec) -> Result<Termination> {
        tracing::debug!(cmd = %spec, cwd = ?spec.cwd, "spawning");
        let status = spec
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| BootstrapError::Spawn {
                program: spec.program_display(),
                source,
            })?;
        Ok(Termination::from(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_whitespace() {
        let spec = CommandSpec::new("py")
            .arg("-3.12")
            .arg("-c")
            .arg("print('a b')");
        assert_eq!(spec.to_string(), "py -3.12 -c \"print('a b')\"");
    }

    #[test]
    fn test_termination_exit_code() {
        assert_eq!(Termination::Exited(3).exit_code(), 3);
        assert_eq!(Termination::Signaled(15).exit_code(), 143);
        assert!(Termination::Exited(0).success());
        assert!(!Termination::Signaled(2).success());
    }

    #[test]
    fn test_probe_missing_binary_is_none() {
        let spec = CommandSpec::new("rqlup-definitely-not-a-real-binary").arg("--version");
        assert!(SystemRunner.probe(&spec).is_none());
    }

    #[test]
    fn test_run_missing_binary_is_spawn_error() {
        let spec = CommandSpec::new("rqlup-definitely-not-a-real-binary");
        let err = SystemRunner.run(&spec).unwrap_err();
        assert!(matches!(err, BootstrapError::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_code() {
        let spec = CommandSpec::new("sh").args(["-c", "exit 7"]);
        assert_eq!(SystemRunner.run(&spec).unwrap(), Termination::Exited(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_signal() {
        let spec = CommandSpec::new("sh").args(["-c", "kill -TERM $$"]);
        assert_eq!(SystemRunner.run(&spec).unwrap(), Termination::Signaled(15));
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_trims_stdout() {
        let spec = CommandSpec::new("sh").args(["-c", "echo ' 3.12 '"]);
        assert_eq!(SystemRunner.probe(&spec).as_deref(), Some("3.12"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_uses_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("sh")
            .args(["-c", "touch marker"])
            .current_dir(tmp.path());
        assert!(SystemRunner.run(&spec).unwrap().success());
        assert!(tmp.path().join("marker").exists());
    }
}
