// src/logging.rs
// =============================================================================
// Structured logging setup.
//
// Logs go to stderr so they never mix with the table or JSON on stdout.
// RUST_LOG wins when set; otherwise `index_checker=warn` (or `=debug` with
// --verbose).
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "index_checker=debug"
    } else {
        "index_checker=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // try_init so a second call (tests) doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
