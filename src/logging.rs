// src/logging.rs
// Diagnostics go to stderr through tracing; the scan output itself does not.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Picks the default filter. RUST_LOG, when set, always wins.
fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "endpoint_finder=debug"
    } else if quiet {
        "endpoint_finder=error"
    } else {
        "endpoint_finder=warn"
    }
}

pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}
