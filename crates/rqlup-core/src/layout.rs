//! Fixed on-disk layout of an rql installation.
//!
//! ```text
//! <root>/
//!   vendor/
//!     venv/
//!       bin/python            (Unix)
//!       Scripts/python.exe    (Windows)
//! ```
//!
//! The layout is a value built from an installation root, so both the
//! provisioner and the launcher agree on the paths without global state.

use std::path::{Path, PathBuf};

/// Directory under the installation root that holds vendored artifacts.
pub const VENDOR_DIR: &str = "vendor";

/// Isolated environment directory, relative to [`VENDOR_DIR`].
pub const VENV_DIR: &str = "venv";

/// Python module started by the launcher.
pub const RQL_MODULE: &str = "rql";

/// Target platform family. Decides interpreter candidates and venv layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Interpreter location relative to the venv root.
    pub fn venv_interpreter(self) -> PathBuf {
        match self {
            Platform::Unix => Path::new("bin").join("python"),
            Platform::Windows => Path::new("Scripts").join("python.exe"),
        }
    }
}

/// Paths of one installation, derived from its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: PathBuf,
    platform: Platform,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_platform(root, Platform::current())
    }

    pub fn with_platform(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join(VENDOR_DIR)
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.vendor_dir().join(VENV_DIR)
    }

    /// The environment's interpreter. Deterministic; no search is involved.
    pub fn venv_python(&self) -> PathBuf {
        self.venv_dir().join(self.platform.venv_interpreter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_layout() {
        let layout = InstallLayout::with_platform("/opt/rql", Platform::Unix);
        assert_eq!(layout.vendor_dir(), PathBuf::from("/opt/rql/vendor"));
        assert_eq!(layout.venv_dir(), PathBuf::from("/opt/rql/vendor/venv"));
        assert_eq!(
            layout.venv_python(),
            PathBuf::from("/opt/rql/vendor/venv/bin/python")
        );
    }

    #[test]
    fn test_windows_layout() {
        let layout = InstallLayout::with_platform("root", Platform::Windows);
        let expected = Path::new("root")
            .join("vendor")
            .join("venv")
            .join("Scripts")
            .join("python.exe");
        assert_eq!(layout.venv_python(), expected);
    }
}
