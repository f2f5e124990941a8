//! Interpreter discovery and environment provisioning for the rql CLI.

pub mod interpreter;
pub mod log;
pub mod provision;

#[cfg(test)]
mod testing;

pub use interpreter::{
    candidates_for, Candidate, InterpreterFinder, ProbeOutcome, ProbeReport, PythonVersion,
    SelectedInterpreter, MIN_PYTHON,
};
pub use provision::{ProvisionOptions, ProvisionReport, Provisioner};
