//! Python interpreter candidates, version probing and discovery.
//!
//! Candidates are tried in priority order. Each is asked to print its
//! `major.minor` version; the first one at or above [`MIN_PYTHON`] wins.
//! A candidate that is missing, fails, or prints garbage is skipped.

use std::ffi::OsString;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use rqlup_core::{BootstrapError, CommandRunner, CommandSpec, Platform, Result};
use serde::Serialize;

/// Minimum supported Python version.
pub const MIN_PYTHON: PythonVersion = PythonVersion {
    major: 3,
    minor: 11,
};

/// Prints `major.minor` of the running interpreter.
pub const VERSION_PROBE_SCRIPT: &str =
    "import sys; print(f'{sys.version_info[0]}.{sys.version_info[1]}')";

/// A `major.minor` Python version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Same major series as [`MIN_PYTHON`] and not older than it.
    pub fn is_supported(&self) -> bool {
        self.major == MIN_PYTHON.major && self.minor >= MIN_PYTHON.minor
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("not a major.minor version: {s:?}"))?;
        let major = major
            .parse::<u32>()
            .map_err(|_| format!("bad major version in {s:?}"))?;
        let minor = minor
            .parse::<u32>()
            .map_err(|_| format!("bad minor version in {s:?}"))?;
        Ok(Self { major, minor })
    }
}

/// An interpreter lookup target: a program plus fixed leading arguments
/// (e.g. `py -3.12` on Windows).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub program: String,
    pub args: Vec<String>,
}

impl Candidate {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a user-supplied command such as `"py -3.12"` or `"/usr/bin/python3"`.
    ///
    /// A string naming an existing file is taken whole, so interpreter paths
    /// containing spaces stay intact. Anything else is split on whitespace.
    pub fn parse(command: &str) -> Option<Self> {
        let command = command.trim();
        if command.is_empty() {
            return None;
        }
        if Path::new(command).is_file() {
            return Some(Self::new(command));
        }
        let mut parts = command.split_whitespace();
        let program = parts.next()?;
        Some(Self::with_args(program, parts))
    }

    /// Anchor a relative, path-qualified program (`./py/python3`) at `base`.
    /// Bare names and absolute paths are returned unchanged.
    pub fn anchored(&self, base: &Path) -> Self {
        let program = Path::new(&self.program);
        if program.is_absolute() || program.components().count() < 2 {
            return self.clone();
        }
        let joined: PathBuf = base
            .components()
            .chain(program.components().filter(|c| !matches!(c, Component::CurDir)))
            .collect();
        match joined.to_str() {
            Some(p) => Self::with_args(p, self.args.iter().cloned()),
            None => self.clone(),
        }
    }

    /// Command spec for this candidate followed by `extra` arguments.
    pub fn command<I, S>(&self, extra: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        CommandSpec::new(&self.program)
            .args(self.args.iter().map(OsString::from))
            .args(extra)
    }

    pub fn probe_command(&self) -> CommandSpec {
        self.command(["-c", VERSION_PROBE_SCRIPT])
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for a in &self.args {
            write!(f, " {a}")?;
        }
        Ok(())
    }
}

/// Candidates for a platform, most preferred first.
pub fn candidates_for(platform: Platform) -> Vec<Candidate> {
    match platform {
        Platform::Unix => vec![
            Candidate::new("python3.13"),
            Candidate::new("python3.12"),
            Candidate::new("python3.11"),
            Candidate::new("python3"),
            Candidate::new("python"),
        ],
        Platform::Windows => vec![
            Candidate::with_args("py", ["-3.13"]),
            Candidate::with_args("py", ["-3.12"]),
            Candidate::with_args("py", ["-3.11"]),
            Candidate::with_args("py", ["-3"]),
            Candidate::new("python"),
        ],
    }
}

/// Outcome of probing a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Program not found on PATH; nothing was spawned.
    NotFound,
    /// Spawn failed, non-zero exit, or unparsable output.
    Unusable { reason: String },
    /// Version obtained.
    Version {
        version: PythonVersion,
        supported: bool,
    },
}

/// One probed candidate, as reported by `rqlup candidates`.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub candidate: Candidate,
    pub resolved: Option<PathBuf>,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

/// The interpreter chosen for provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedInterpreter {
    pub candidate: Candidate,
    pub version: PythonVersion,
}

/// Probes candidates through a [`CommandRunner`].
///
/// `which` is consulted first for bare program names so that absent
/// interpreters are skipped without spawning; path-qualified programs are
/// probed directly.
pub struct InterpreterFinder<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    check_path: bool,
}

impl<'a, R: CommandRunner + ?Sized> InterpreterFinder<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            check_path: true,
        }
    }

    /// Skip the `PATH` lookup and always ask the runner. Used with scripted
    /// runners whose programs do not exist on disk.
    pub fn without_path_check(mut self) -> Self {
        self.check_path = false;
        self
    }

    fn resolve(&self, candidate: &Candidate) -> std::result::Result<Option<PathBuf>, ()> {
        if !self.check_path {
            return Ok(None);
        }
        let program = Path::new(&candidate.program);
        if program.components().count() > 1 {
            return if program.exists() {
                Ok(Some(program.to_path_buf()))
            } else {
                Err(())
            };
        }
        which::which(&candidate.program).map(Some).map_err(|_| ())
    }

    pub fn probe(&self, candidate: &Candidate) -> ProbeReport {
        let resolved = match self.resolve(candidate) {
            Ok(p) => p,
            Err(()) => {
                tracing::debug!(candidate = %candidate, "not found on PATH");
                return ProbeReport {
                    candidate: candidate.clone(),
                    resolved: None,
                    outcome: ProbeOutcome::NotFound,
                };
            }
        };

        let outcome = match self.runner.probe(&candidate.probe_command()) {
            None => ProbeOutcome::Unusable {
                reason: "version probe failed".to_string(),
            },
            Some(out) => match out.lines().last().unwrap_or("").parse::<PythonVersion>() {
                Ok(version) => ProbeOutcome::Version {
                    version,
                    supported: version.is_supported(),
                },
                Err(reason) => ProbeOutcome::Unusable { reason },
            },
        };
        tracing::debug!(candidate = %candidate, outcome = ?outcome, "probed");
        ProbeReport {
            candidate: candidate.clone(),
            resolved,
            outcome,
        }
    }

    /// Probe every candidate, in order, without stopping early.
    pub fn probe_all(&self, candidates: &[Candidate]) -> Vec<ProbeReport> {
        candidates.iter().map(|c| self.probe(c)).collect()
    }

    /// First candidate whose probed version is supported. Short-circuits.
    pub fn discover(&self, candidates: &[Candidate]) -> Result<SelectedInterpreter> {
        for candidate in candidates {
            match self.probe(candidate).outcome {
                ProbeOutcome::Version {
                    version,
                    supported: true,
                } => {
                    tracing::info!(interpreter = %candidate, %version, "selected interpreter");
                    return Ok(SelectedInterpreter {
                        candidate: candidate.clone(),
                        version,
                    });
                }
                ProbeOutcome::Version { version, .. } => {
                    tracing::warn!(candidate = %candidate, %version, min = %MIN_PYTHON, "interpreter too old, skipping");
                }
                ProbeOutcome::Unusable { reason } => {
                    tracing::warn!(candidate = %candidate, %reason, "interpreter unusable, skipping");
                }
                ProbeOutcome::NotFound => {}
            }
        }
        Err(BootstrapError::NoCompatibleInterpreter {
            min: MIN_PYTHON.to_string(),
            tried: candidates
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Validate an explicitly requested interpreter (`--python`).
    ///
    /// A relative path is resolved against the current directory first; later
    /// steps run from the installation root.
    pub fn require(&self, candidate: &Candidate) -> Result<SelectedInterpreter> {
        let cwd = std::env::current_dir()
            .map_err(|e| BootstrapError::io("read current directory", e))?;
        let candidate = &candidate.anchored(&cwd);
        let rejected = |reason: String| BootstrapError::InterpreterRejected {
            command: candidate.to_string(),
            reason,
            min: MIN_PYTHON.to_string(),
        };
        match self.probe(candidate).outcome {
            ProbeOutcome::Version {
                version,
                supported: true,
            } => Ok(SelectedInterpreter {
                candidate: candidate.clone(),
                version,
            }),
            ProbeOutcome::Version { version, .. } => Err(rejected(format!("found Python {version}"))),
            ProbeOutcome::Unusable { reason } => Err(rejected(reason)),
            ProbeOutcome::NotFound => Err(rejected("not found".to_string())),
        }
    }
}
