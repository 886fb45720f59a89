//! Diagnostic logging for the binaries.
//!
//! Output goes to stderr so it never mixes with the counts on stdout.
//! Filtering follows `RUST_LOG`:
//! - `RUST_LOG=debug` - one event per dispatched chunk and per collected tally
//! - `RUST_LOG=tally_rs::tally=trace` - module-level filtering
//!
//! Without `RUST_LOG` only warnings are shown, or everything down to `debug`
//! when the caller asks for verbose output.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global stderr subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
