//! rqlup — shared by the `rqlup` (provisioner) and `rql` (launcher) binaries.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use rqlup_core::observability::{init_tracing, TracingMode};
use rqlup_core::BootstrapError;

/// Tag printed in front of every message rqlup itself writes.
pub const TAG: &str = "[rqlup]";

/// Parse `rqlup` arguments and run the selected command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(TracingMode::Provision);

    match cli.command.unwrap_or_else(Commands::default_install) {
        Commands::Install {
            root,
            python,
            skip_upgrade,
        } => commands::install::cmd_install(&root, python.as_deref(), skip_upgrade),
        Commands::Status { root, json } => commands::status::cmd_status(&root, json),
        Commands::Clean {
            root,
            dry_run,
            force,
        } => commands::clean::cmd_clean(&root, dry_run, force),
        Commands::Candidates { json } => commands::candidates::cmd_candidates(json),
    }
}

/// Print a fatal error with the remediation hint; return the exit status.
pub fn report_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BootstrapError>() {
        Some(e) => report_bootstrap_error(e),
        None => {
            eprintln!("{TAG} error: {err:#}");
            rqlup_core::error::FAILURE_EXIT_CODE
        }
    }
}

fn report_bootstrap_error(err: &BootstrapError) -> i32 {
    eprintln!("{TAG} error: {err}");
    eprintln!("{TAG} hint: {}", err.hint());
    err.exit_code()
}

/// Entry point of the `rql` binary. Never returns.
pub fn run_launcher() -> ! {
    init_tracing(TracingMode::Launch);
    let args: Vec<std::ffi::OsString> = std::env::args_os().skip(1).collect();

    let outcome = rqlup_launch::Launcher::from_current_exe().and_then(|l| l.delegate(args));
    match outcome {
        Ok(termination) => rqlup_launch::propagate(termination),
        Err(e) => std::process::exit(report_bootstrap_error(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_report_error_uses_bootstrap_exit_code() {
        let err = anyhow::Error::new(BootstrapError::VenvCreation {
            path: PathBuf::from("vendor/venv"),
            status: 7,
        });
        assert_eq!(report_error(&err), 7);
    }

    #[test]
    fn test_report_error_through_context() {
        let err = anyhow::Error::new(BootstrapError::PackageInstall {
            detail: "exit status 1".into(),
        })
        .context("provisioning failed");
        assert_eq!(report_error(&err), 1);
    }

    #[test]
    fn test_report_error_plain_anyhow() {
        let err = anyhow::anyhow!("root does not exist");
        assert_eq!(report_error(&err), 1);
    }
}
