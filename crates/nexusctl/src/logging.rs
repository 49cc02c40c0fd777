//! Logging setup for nexusctl
//!
//! Logs go to stderr so the report on stdout stays clean.
//! Default level is info; `-v` switches to debug; RUST_LOG overrides both.

use tracing_subscriber::EnvFilter;

/// Filter directive for the chosen verbosity
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Initialize the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
