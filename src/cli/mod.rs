//! CLI module for farmup.
//!
//! # Usage
//!
//! ```ignore
//! use farmup::cli::{parse_args, run_cli_command};
//! use farmup::config::UpdaterConfig;
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, UpdaterConfig::from_env())?;
//! ```

pub mod args;
pub mod update;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use update::{handle_check_command, handle_update_command, system_deps};
pub use version::{handle_version_command, version_line, VERSION};

use color_eyre::Result;

use crate::config::UpdaterConfig;

/// Run a CLI command.
///
/// Every session that does not restart the application ends with `Ok(())`,
/// failed ones included; failures are reported through the log.
pub fn run_cli_command(command: CliCommand, config: UpdaterConfig) -> Result<()> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Check => {
            handle_check_command(config)?;
        }
        CliCommand::Update { assume_yes } => {
            handle_update_command(config, assume_yes)?;
        }
    }
    Ok(())
}
