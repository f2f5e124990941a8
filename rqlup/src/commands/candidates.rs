//! `rqlup candidates` — show how each interpreter candidate probes.

use anyhow::Result;

use rqlup_core::{Platform, SystemRunner};
use rqlup_env::{candidates_for, InterpreterFinder, ProbeOutcome, ProbeReport, MIN_PYTHON};

use crate::TAG;

/// `rqlup candidates [--json]`
pub fn cmd_candidates(json: bool) -> Result<()> {
    let candidates = candidates_for(Platform::current());
    let reports = InterpreterFinder::new(&SystemRunner).probe_all(&candidates);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    eprintln!("{TAG} interpreter candidates (need Python >= {MIN_PYTHON}), in priority order:");
    let mut selected = false;
    for report in &reports {
        let line = describe(report);
        let marker = if !selected && is_supported(report) {
            selected = true;
            "→"
        } else {
            " "
        };
        eprintln!("  {marker} {line}");
    }
    if !selected {
        eprintln!("{TAG} no compatible interpreter found");
    }
    Ok(())
}

fn is_supported(report: &ProbeReport) -> bool {
    matches!(
        report.outcome,
        ProbeOutcome::Version {
            supported: true,
            ..
        }
    )
}

fn describe(report: &ProbeReport) -> String {
    let path = report
        .resolved
        .as_ref()
        .map(|p| format!(" [{}]", p.display()))
        .unwrap_or_default();
    match report.outcome {
        ProbeOutcome::NotFound => format!("{}: not found", report.candidate),
        ProbeOutcome::Unusable { ref reason } => {
            format!("{}{}: unusable ({})", report.candidate, path, reason)
        }
        ProbeOutcome::Version { version, supported } => format!(
            "{}{}: Python {}{}",
            report.candidate,
            path,
            version,
            if supported { "" } else { " (too old)" }
        ),
    }
}
