pub mod config;
pub mod error;
pub mod layout;
pub mod observability;
pub mod process;

pub use error::{BootstrapError, Result};
pub use layout::{InstallLayout, Platform};
pub use process::{CommandRunner, CommandSpec, SystemRunner, Termination};
