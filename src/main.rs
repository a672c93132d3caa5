use color_eyre::Result;

use farmup::cli::{parse_args, run_cli_command, CliCommand};
use farmup::config::UpdaterConfig;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version before any initialization
    if command == CliCommand::Version {
        farmup::cli::handle_version_command();
        return Ok(());
    }

    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run_cli_command(command, UpdaterConfig::from_env())
}
