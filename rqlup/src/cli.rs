use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rqlup - install the rql CLI into an isolated Python environment
#[derive(Parser, Debug)]
#[command(name = "rqlup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `install` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Provision vendor/venv and install rql into it
    ///
    /// Steps: find Python >= 3.11, create vendor/venv if absent, upgrade
    /// pip/setuptools/wheel, then `pip install .` from the root.
    ///
    /// Examples:
    ///   rqlup install
    ///   rqlup install --python python3.12
    ///   rqlup install --root ~/src/rql --skip-upgrade
    Install {
        /// Installation root (the rql repository checkout)
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,

        /// Use this interpreter instead of searching (e.g. "python3.12" or "py -3.12")
        #[arg(long, value_name = "CMD")]
        python: Option<String>,

        /// Skip upgrading pip/setuptools/wheel
        #[arg(long)]
        skip_upgrade: bool,
    },

    /// Show the state of the installation and the interpreter rqlup would use
    Status {
        /// Installation root
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove vendor/venv so the next install starts from scratch
    Clean {
        /// Installation root
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,

        /// Only show what would be removed
        #[arg(long)]
        dry_run: bool,

        /// Do not ask for confirmation
        #[arg(long, short)]
        force: bool,
    },

    /// Probe every interpreter candidate, in priority order
    Candidates {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn default_install() -> Self {
        Commands::Install {
            root: PathBuf::from("."),
            python: None,
            skip_upgrade: false,
        }
    }
}
