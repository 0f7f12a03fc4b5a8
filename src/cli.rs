// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using a
// plain Rust struct and attributes (the #[...] things).
//
// The flags mirror the classic endpoint-finder tools:
//   -u <url>     scan one URL
//   -l <file>    scan every URL listed in a file
//   (stdin)      or pipe URLs in: cat urls.txt | endpoint-finder
// =============================================================================

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Default number of concurrent workers.
pub const DEFAULT_THREADS: usize = 20;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug, Clone)]
#[command(
    name = "endpoint-finder",
    version = "0.1.0",
    about = "A fast, concurrent endpoint finder for JavaScript files",
    long_about = "endpoint-finder fetches each target URL, scans the raw body for quoted \
                  path-like strings (\"/api/v1/users\", '/static/app.js', ...) and prints \
                  the unique endpoints it finds."
)]
pub struct Cli {
    /// Single URL to scan
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// File containing a list of URLs to scan (one per line)
    #[arg(short = 'l', long = "list", value_name = "PATH")]
    pub list: Option<PathBuf>,

    /// File to save the final output of unique endpoints
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of concurrent threads to use
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Resolve found paths to full URLs
    #[arg(short = 'r', long = "resolve")]
    pub resolve: bool,

    /// Silent mode. Only output the final list of unique endpoints
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Disable colorized output (-no-color is accepted too)
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    pub timeout: u64,

    /// Print the final report as JSON instead of the human-readable summary
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr (RUST_LOG overrides this)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

// clap has no single-dash long flags, so the classic `-no-color` spelling is
// rewritten before parsing. Without this clap reads it as the short flags
// -n -o -- -c ... and rejects the command line.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if arg == "-no-color" {
                OsString::from("--no-color")
            } else {
                arg
            }
        })
        .collect()
}
