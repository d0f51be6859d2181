//! filesync - versioned copies of changed files
//!
//! Main binary entry point for the command-line interface.

use anyhow::Context;
use clap::Parser;
use filesync::cli::{run, Cli};
use filesync::config::Config;
use filesync::logging::init_logging;
use filesync::report::create_presenter;
use std::process::ExitCode;
use tracing::error;

/// Exit status for a scan target that is missing or not a directory
const EXIT_INVALID_PATH: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Once logging is up the console layer already prints to stderr
            if tracing::dispatcher::has_been_set() {
                error!("{:#}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            let invalid_path = e
                .downcast_ref::<filesync::Error>()
                .is_some_and(filesync::Error::is_invalid_path);
            if invalid_path {
                ExitCode::from(EXIT_INVALID_PATH)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn try_main(cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);

    init_logging(&config.logging, cli.quiet)?;

    let presenter = create_presenter(config.output.plain);
    let mut stdout = std::io::stdout().lock();
    let report = run(&cli.path, &config, cli.dry_run, presenter.as_ref(), &mut stdout)?;

    if let Some(output) = &cli.output {
        report
            .write_json(output)
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
    }

    Ok(())
}
