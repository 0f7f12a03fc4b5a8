// src/config.rs
// =============================================================================
// Turns the parsed command line into an immutable run configuration.
//
// The Cli struct is "what the user typed"; ScanConfig is "how this run
// behaves". It is built and validated once in main and then only ever
// borrowed, so no part of the scan can change settings halfway through.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::FinderError;
use crate::report::Theme;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of concurrent workers
    pub threads: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Resolve extracted paths against the URL they were found in
    pub resolve: bool,
    /// Only print the final sorted endpoint list
    pub quiet: bool,
    /// Print a JSON report at the end
    pub json: bool,
    pub theme: Theme,
    pub output: Option<PathBuf>,
}

impl ScanConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, FinderError> {
        if cli.threads == 0 {
            return Err(FinderError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        if cli.timeout == 0 {
            return Err(FinderError::InvalidConfig(
                "timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            threads: cli.threads,
            timeout: Duration::from_secs(cli.timeout),
            resolve: cli.resolve,
            quiet: cli.quiet,
            json: cli.json,
            theme: Theme::new(!cli.no_color),
            output: cli.output.clone(),
        })
    }

    /// Whether progress lines (per-URL discoveries, errors, summary) are shown.
    pub fn streams_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
