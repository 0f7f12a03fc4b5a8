// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the run configuration and collect the target URLs
// 3. Open the output file (if any) BEFORE touching the network
// 4. Run the scan, then print / save the sorted unique endpoints
// 5. Exit with 0 when the scan ran (even if some URLs failed),
//    1 when the run could not be set up
//
// Rust concepts used:
// - async/await: The scan makes many network requests concurrently
// - Result<T, E> and ?: Setup errors bubble up to main in one place
// - Channels: Ctrl-C is forwarded to the workers through a watch channel
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - immutable run configuration
mod error; // src/error.rs - error types
mod input; // src/input.rs - reading target URLs
mod logging; // src/logging.rs - tracing setup
mod report; // src/report/ - console, JSON and file output
mod scanner; // src/scanner/ - the fetch-and-extract pipeline

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use tokio::sync::watch;

use cli::Cli;
use config::ScanConfig;
use error::FinderError;
use input::InputSource;
use report::{Reporter, Theme};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));
    logging::init(cli.verbose, cli.quiet);

    // The theme is fixed here, before anything can fail, so fatal errors
    // honour --no-color too
    let theme = Theme::new(!cli.no_color);
    theme.install();

    let exit_code = match run(&cli).await {
        Ok(()) => 0,
        Err(e) => {
            report_fatal(&theme, &e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> Result<()> {
    let config = ScanConfig::from_cli(cli)?;

    let source = InputSource::select(cli, !std::io::stdin().is_terminal());
    let targets = input::read_targets(&source)?;

    let output = config
        .output
        .as_deref()
        .map(report::create_output_file)
        .transpose()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping workers");
            let _ = shutdown_tx.send(true);
        }
    });

    let reporter = Reporter::new(&config);
    reporter.scan_started(targets.len(), config.threads);

    let outcome = scanner::run_scan(targets, &config, &reporter, shutdown_rx).await?;
    reporter.finish(&outcome, output)?;

    Ok(())
}

// Prints a setup error to stderr. A missing input also gets the banner and
// the usage text, so a bare `endpoint-finder` explains itself.
fn report_fatal(theme: &Theme, error: &anyhow::Error) {
    match error.downcast_ref::<FinderError>() {
        Some(FinderError::InputUnavailable) => {
            eprintln!("{}", report::banner(theme));
            eprintln!("{}", Cli::command().render_help());
            eprintln!();
            eprintln!("{}", report::fatal_line(theme, &error.to_string()));
        }
        _ => {
            eprintln!("{}", report::fatal_line(theme, &format!("Error: {}", error)));
        }
    }
}
