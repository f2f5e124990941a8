//! Error taxonomy shared by the provisioner and the launcher.

use std::path::PathBuf;

use thiserror::Error;

/// Status used for every failure that has no status of its own.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Remediation printed after every fatal error.
pub const REMEDIATION_HINT: &str = "run \"rqlup install\" from the repository root";

/// Errors raised while provisioning or launching.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("no compatible Python interpreter found (need Python >= {min}; tried: {tried})")]
    NoCompatibleInterpreter { min: String, tried: String },

    #[error("interpreter '{command}' is not usable ({reason}); need Python >= {min}")]
    InterpreterRejected {
        command: String,
        reason: String,
        min: String,
    },

    #[error("virtual environment creation failed at {} (status {status})", path.display())]
    VenvCreation { path: PathBuf, status: i32 },

    #[error("failed to upgrade pip/setuptools/wheel in the environment ({detail})")]
    ToolchainUpgrade { detail: String },

    #[error("failed to install the rql package into the environment ({detail})")]
    PackageInstall { detail: String },

    #[error("environment interpreter not found at {}", path.display())]
    MissingInterpreter { path: PathBuf },

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BootstrapError {
    /// Process exit status for this error.
    ///
    /// Venv creation propagates the creation step's own status; every other
    /// failure exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::VenvCreation { status, .. } => *status,
            _ => FAILURE_EXIT_CODE,
        }
    }

    /// One-line remediation shown under the error.
    pub fn hint(&self) -> &'static str {
        REMEDIATION_HINT
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BootstrapError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
