//! `rqlup status` — what is installed where, and what would be used.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use rqlup_core::{CommandRunner, CommandSpec, InstallLayout, SystemRunner};
use rqlup_env::{candidates_for, InterpreterFinder, SelectedInterpreter};

use super::resolve_root;
use crate::TAG;

/// Prints the installed rql version, or nothing if rql is not importable.
const RQL_IMPORT_PROBE: &str = "import rql; print(getattr(rql, '__version__', 'unknown'))";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    /// Nothing at vendor/venv.
    Absent,
    /// vendor/venv exists but the interpreter or the rql package is missing.
    Partial,
    /// Interpreter present and `import rql` works.
    Ready,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub root: PathBuf,
    pub venv_dir: PathBuf,
    pub venv_exists: bool,
    pub venv_python: PathBuf,
    pub venv_python_exists: bool,
    /// Version reported by `import rql`, when importable.
    pub rql_version: Option<String>,
    /// Interpreter a fresh install would use.
    pub discovered: Option<SelectedInterpreter>,
    pub state: InstallState,
}

pub(crate) fn collect<R: CommandRunner + ?Sized>(
    layout: &InstallLayout,
    runner: &R,
    discovered: Option<SelectedInterpreter>,
) -> StatusReport {
    let venv_dir = layout.venv_dir();
    let venv_python = layout.venv_python();
    // Same test install uses to decide whether to skip venv creation.
    let venv_exists = venv_dir.exists();
    let venv_python_exists = venv_python.exists();
    let rql_version = if venv_python_exists {
        runner.probe(&CommandSpec::new(&venv_python).args(["-c", RQL_IMPORT_PROBE]))
    } else {
        None
    };
    let state = match (venv_exists, venv_python_exists, rql_version.is_some()) {
        (false, _, _) => InstallState::Absent,
        (true, true, true) => InstallState::Ready,
        _ => InstallState::Partial,
    };
    StatusReport {
        root: layout.root().to_path_buf(),
        venv_dir,
        venv_exists,
        venv_python,
        venv_python_exists,
        rql_version,
        discovered,
        state,
    }
}

/// `rqlup status [--root DIR] [--json]`
pub fn cmd_status(root: &Path, json: bool) -> Result<()> {
    let layout = InstallLayout::new(resolve_root(root)?);
    let discovered = InterpreterFinder::new(&SystemRunner)
        .discover(&candidates_for(layout.platform()))
        .ok();
    let report = collect(&layout, &SystemRunner, discovered);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let yes_no = |b: bool| if b { "yes" } else { "no" };
    eprintln!("{TAG} root:         {}", report.root.display());
    eprintln!(
        "{TAG} environment:  {} (exists: {})",
        report.venv_dir.display(),
        yes_no(report.venv_exists)
    );
    eprintln!(
        "{TAG} interpreter:  {} (exists: {})",
        report.venv_python.display(),
        yes_no(report.venv_python_exists)
    );
    match report.rql_version {
        Some(ref v) => eprintln!("{TAG} rql:          {}", v),
        None => eprintln!("{TAG} rql:          not installed"),
    }
    match report.discovered {
        Some(ref s) => eprintln!("{TAG} python:       {} (Python {})", s.candidate, s.version),
        None => eprintln!("{TAG} python:       no compatible interpreter (need >= {})", rqlup_env::MIN_PYTHON),
    }
    match report.state {
        InstallState::Ready => eprintln!("{TAG} ✓ ready"),
        InstallState::Absent => eprintln!("{TAG} not installed; run \"rqlup install\""),
        InstallState::Partial => eprintln!(
            "{TAG} ⚠ environment is incomplete; \"rqlup install\" will reuse it as-is. Run \"rqlup clean\" first to rebuild"
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rqlup_core::{Platform, Termination};
    use std::cell::RefCell;

    struct ImportRunner {
        answer: Option<String>,
        probes: RefCell<usize>,
    }

    impl CommandRunner for ImportRunner {
        fn probe(&self, _spec: &CommandSpec) -> Option<String> {
            *self.probes.borrow_mut() += 1;
            self.answer.clone()
        }

        fn run(&self, _spec: &CommandSpec) -> rqlup_core::Result<Termination> {
            unreachable!("status never runs steps")
        }
    }

    fn runner(answer: Option<&str>) -> ImportRunner {
        ImportRunner {
            answer: answer.map(String::from),
            probes: RefCell::new(0),
        }
    }

    #[test]
    fn test_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = InstallLayout::with_platform(tmp.path(), Platform::Unix);
        let r = runner(Some("0.1.0"));
        let report = collect(&layout, &r, None);
        assert_eq!(report.state, InstallState::Absent);
        assert_eq!(*r.probes.borrow(), 0);
    }

    #[test]
    fn test_partial_when_python_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = InstallLayout::with_platform(tmp.path(), Platform::Unix);
        std::fs::create_dir_all(layout.venv_dir()).unwrap();
        let report = collect(&layout, &runner(None), None);
        assert_eq!(report.state, InstallState::Partial);
        assert!(!report.venv_python_exists);
    }

    #[test]
    fn test_file_at_venv_path_is_not_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = InstallLayout::with_platform(tmp.path(), Platform::Unix);
        std::fs::create_dir_all(layout.vendor_dir()).unwrap();
        std::fs::write(layout.venv_dir(), "").unwrap();
        let report = collect(&layout, &runner(None), None);
        assert!(report.venv_exists);
        assert_eq!(report.state, InstallState::Partial);
    }

    #[test]
    fn test_partial_when_package_not_importable() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = InstallLayout::with_platform(tmp.path(), Platform::Unix);
        std::fs::create_dir_all(layout.venv_python().parent().unwrap()).unwrap();
        std::fs::write(layout.venv_python(), "").unwrap();
        let report = collect(&layout, &runner(None), None);
        assert_eq!(report.state, InstallState::Partial);
    }

    #[test]
    fn test_ready() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = InstallLayout::with_platform(tmp.path(), Platform::Unix);
        std::fs::create_dir_all(layout.venv_python().parent().unwrap()).unwrap();
        std::fs::write(layout.venv_python(), "").unwrap();
        let report = collect(&layout, &runner(Some("0.1.0")), None);
        assert_eq!(report.state, InstallState::Ready);
        assert_eq!(report.rql_version.as_deref(), Some("0.1.0"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["state"], "ready");
        assert_eq!(json["venv_python_exists"], true);
    }
}
