//! File logging.
//!
//! The screen belongs to the launcher UI, so events go to `ccode.log` in
//! the config directory instead of stderr.
//!
//! Filter priority: `CCODE_LOG`, then `RUST_LOG`, then `debug` with
//! `--verbose`, otherwise `warn`.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "CCODE_LOG";

/// Installs the global subscriber. Returns `false` when the log file or the
/// subscriber could not be set up; the program then runs without logs.
pub fn init(dir: &Path, verbose: bool) -> bool {
    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("ccode")
        .filename_suffix("log")
        .build(dir)
    {
        Ok(appender) => appender,
        Err(_) => return false,
    };

    let layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(verbose))
        .with(layer)
        .try_init()
        .is_ok()
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(fallback_directive(verbose))
}

fn fallback_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}
