//! Scripted [`CommandRunner`] for provisioning tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use rqlup_core::{BootstrapError, CommandRunner, CommandSpec, Result, Termination};

enum Scripted {
    Finish(Termination),
    SpawnError,
}

/// Records every command and answers from a script.
///
/// Probes are answered by program name. Runs are matched by substring against
/// the rendered command line; the first matching rule wins and unmatched runs
/// exit 0.
#[derive(Default)]
pub struct ScriptedRunner {
    probes: HashMap<String, String>,
    runs: Vec<(String, Scripted)>,
    probed: RefCell<Vec<CommandSpec>>,
    ran: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe(mut self, program: &str, stdout: &str) -> Self {
        self.probes.insert(program.to_string(), stdout.to_string());
        self
    }

    pub fn with_run(mut self, needle: &str, termination: Termination) -> Self {
        self.runs
            .push((needle.to_string(), Scripted::Finish(termination)));
        self
    }

    pub fn with_spawn_error(mut self, needle: &str) -> Self {
        self.runs.push((needle.to_string(), Scripted::SpawnError));
        self
    }

    pub fn probed_programs(&self) -> Vec<String> {
        self.probed
            .borrow()
            .iter()
            .map(CommandSpec::program_display)
            .collect()
    }

    pub fn ran(&self) -> Vec<CommandSpec> {
        self.ran.borrow().clone()
    }

    pub fn ran_lines(&self) -> Vec<String> {
        self.ran.borrow().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn probe(&self, spec: &CommandSpec) -> Option<String> {
        self.probed.borrow_mut().push(spec.clone());
        self.probes.get(&spec.program_display()).cloned()
    }

    fn run(&self, spec: &CommandSpec) -> Result<Termination> {
        self.ran.borrow_mut().push(spec.clone());
        let line = spec.to_string();
        match self.runs.iter().find(|(needle, _)| line.contains(needle.as_str())) {
            Some((_, Scripted::Finish(t))) => Ok(*t),
            Some((_, Scripted::SpawnError)) => Err(BootstrapError::Spawn {
                program: spec.program_display(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted spawn failure"),
            }),
            None => Ok(Termination::Exited(0)),
        }
    }
}
