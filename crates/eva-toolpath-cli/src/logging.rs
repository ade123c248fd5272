//! Logging setup.

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// with `--verbose`. JSON mode defaults to warnings only.
pub fn init_logging(verbose: bool, json: bool) {
    let default_level = match (verbose, json) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "eva_toolpath_core={0},eva_toolpaths={0},warn",
            default_level
        ))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
