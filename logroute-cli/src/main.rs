use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use logroute_cli::cli::Cli;
use logroute_cli::commands;
use logroute_cli::logging;
use logroute_cli::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config errors are reported by the command itself, logging falls back to defaults.
    let config = commands::load_config(cli.config.as_deref()).await;
    let mut general = config
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    if let Err(e) = logging::init_tracing(&general) {
        eprintln!("{} {}", "error:".red().bold(), e);
        return ExitCode::from(1);
    }

    tracing::debug!(command = ?cli.command, "logroute starting");

    let writer = OutputWriter::new(cli.output);
    match commands::execute(cli, config, &writer).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
