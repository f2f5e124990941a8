//! Remove the provisioned environment.
//!
//! `rqlup install` never recreates an existing `vendor/venv`, even a broken
//! one. This command is the explicit way to start over.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use rqlup_core::InstallLayout;

use super::resolve_root;
use crate::TAG;

/// What a clean run did.
#[derive(Debug, PartialEq, Eq)]
pub enum CleanOutcome {
    NothingToRemove,
    DryRun { bytes: u64 },
    Cancelled,
    Removed { bytes: u64 },
}

/// `rqlup clean [--root DIR] [--dry-run] [--force]`
pub fn cmd_clean(root: &Path, dry_run: bool, force: bool) -> Result<()> {
    let layout = InstallLayout::new(resolve_root(root)?);
    clean_venv(&layout, dry_run, force, confirm_on_stdin)?;
    Ok(())
}

pub(crate) fn clean_venv<F>(
    layout: &InstallLayout,
    dry_run: bool,
    force: bool,
    confirm: F,
) -> Result<CleanOutcome>
where
    F: FnOnce(&Path) -> Result<bool>,
{
    let venv = layout.venv_dir();
    if !venv.exists() {
        eprintln!("{TAG} No environment found at {}", venv.display());
        return Ok(CleanOutcome::NothingToRemove);
    }

    let bytes = dir_size(&venv);
    eprintln!("{TAG} Environment: {} ({})", venv.display(), format_size(bytes));

    if dry_run {
        eprintln!("{TAG} (Dry run — nothing removed. Remove --dry-run to delete.)");
        return Ok(CleanOutcome::DryRun { bytes });
    }

    if !force && !confirm(&venv)? {
        eprintln!("Cancelled.");
        return Ok(CleanOutcome::Cancelled);
    }

    fs::remove_dir_all(&venv)
        .with_context(|| format!("Failed to remove environment: {}", venv.display()))?;
    tracing::info!(path = %venv.display(), bytes, "removed environment");
    eprintln!("{TAG} ✓ Removed environment, freed {}", format_size(bytes));
    Ok(CleanOutcome::Removed { bytes })
}

fn confirm_on_stdin(venv: &Path) -> Result<bool> {
    eprint!("\nRemove {}? [y/N] ", venv.display());
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Compute total size of a directory recursively. Symlinks are not followed.
fn dir_size(path: &Path) -> u64 {
    let mut total: u64 = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let Ok(meta) = entry.path().symlink_metadata() else {
                continue;
            };
            if meta.is_dir() {
                total += dir_size(&entry.path());
            } else {
                total += meta.len();
            }
        }
    }
    total
}

/// Format byte size to human-readable string.
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rqlup_core::Platform;

    fn populated(root: &Path) -> InstallLayout {
        let layout = InstallLayout::with_platform(root, Platform::Unix);
        let bin = layout.venv_dir().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("python"), vec![0u8; 2048]).unwrap();
        fs::write(layout.vendor_dir().join("keep.txt"), "x").unwrap();
        layout
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_nothing_to_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = InstallLayout::with_platform(tmp.path(), Platform::Unix);
        let out = clean_venv(&layout, false, true, |_| unreachable!()).unwrap();
        assert_eq!(out, CleanOutcome::NothingToRemove);
    }

    #[test]
    fn test_dry_run_keeps_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = populated(tmp.path());
        let out = clean_venv(&layout, true, true, |_| unreachable!()).unwrap();
        assert_eq!(out, CleanOutcome::DryRun { bytes: 2048 });
        assert!(layout.venv_python().exists());
    }

    #[test]
    fn test_force_removes_only_venv() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = populated(tmp.path());
        let out = clean_venv(&layout, false, true, |_| unreachable!()).unwrap();
        assert_eq!(out, CleanOutcome::Removed { bytes: 2048 });
        assert!(!layout.venv_dir().exists());
        assert!(layout.vendor_dir().join("keep.txt").exists());
    }

    #[test]
    fn test_declined_confirmation() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = populated(tmp.path());
        let out = clean_venv(&layout, false, false, |_| Ok(false)).unwrap();
        assert_eq!(out, CleanOutcome::Cancelled);
        assert!(layout.venv_dir().exists());
    }

    #[test]
    fn test_accepted_confirmation() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = populated(tmp.path());
        let out = clean_venv(&layout, false, false, |_| Ok(true)).unwrap();
        assert!(matches!(out, CleanOutcome::Removed { .. }));
    }
}
