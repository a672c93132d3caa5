//! Command-line argument parsing for farmup.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Report whether an update exists, change nothing
    Check,
    /// Full update session (default)
    Update {
        /// Skip the confirmation prompt
        assume_yes: bool,
    },
}

/// Parse command-line arguments and return the appropriate command.
///
/// `--version` wins over everything else, `--check` over `--yes`. Unknown
/// arguments are ignored.
///
/// # Examples
///
/// ```
/// use farmup::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["farmup".to_string(), "--yes".to_string()];
/// assert_eq!(
///     parse_args(args.into_iter()),
///     CliCommand::Update { assume_yes: true }
/// );
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut check = false;
    let mut assume_yes = false;

    for arg in args.skip(1) {
        // Skip the program name
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--check" => check = true,
            "--yes" | "-y" => assume_yes = true,
            _ => {}
        }
    }

    if check {
        CliCommand::Check
    } else {
        CliCommand::Update { assume_yes }
    }
}
