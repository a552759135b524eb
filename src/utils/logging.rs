//! Diagnostic logging setup.
//!
//! The full-screen interface owns stdout and stderr, so diagnostics go to a
//! file when one is requested and are dropped otherwise. One-shot commands
//! log to stderr. The filter is read from `HEIDI_LOG` and defaults to `info`.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "HEIDI_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Discard diagnostics.
    Silent,
    Stderr,
    File(&'a Path),
}

impl<'a> LogTarget<'a> {
    /// Pick the target for a run: an explicit file always wins, otherwise
    /// interactive sessions stay silent and one-shot commands use stderr.
    pub fn select(log_file: Option<&'a Path>, interactive: bool) -> Self {
        match (log_file, interactive) {
            (Some(path), _) => LogTarget::File(path),
            (None, true) => LogTarget::Silent,
            (None, false) => LogTarget::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call once per process; a second
/// call reports the failure instead of panicking.
pub fn init_logging(target: LogTarget<'_>) -> Result<(), Box<dyn Error + Send + Sync>> {
    match target {
        LogTarget::Silent => Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    }
}
