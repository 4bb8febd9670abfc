//! Attest CLI - verify a claim registry from the command line.

use attest_cli::commands;
use attest_cli::error::{EXIT_FAIL, EXIT_PASS};
use attest_cli::{logging, Cli, Command, Config, Formatter};
use clap::Parser;

fn main() {
    let status = match run() {
        Ok(status) => status,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_status()
        }
    };
    std::process::exit(status);
}

fn run() -> attest_cli::Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose, !cli.no_color);

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;
    if !color_enabled {
        colored::control::set_override(false);
    }

    let formatter = Formatter::new(format, color_enabled);
    let registry = cli.registry.as_deref();

    let report = match cli.command {
        None | Some(Command::Run) => commands::execute_run(registry, &config.engine, &formatter)?,
        Some(Command::Audit) => commands::execute_audit(registry, &config.engine, &formatter)?,
        Some(Command::Export(args)) => {
            commands::execute_export(args, registry, &config, &formatter)?
        }
    };

    Ok(if report.overall_pass { EXIT_PASS } else { EXIT_FAIL })
}
