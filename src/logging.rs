//! Tracing subscriber setup for the presenter binary.
//!
//! Logs always go to stderr so stdout stays clean for shell callers.
//!
//! # Filter priority (highest to lowest)
//!
//! 1. `MINUI_PRESENTER_LOG` (directives, e.g. `minui_presenter=debug`)
//! 2. `RUST_LOG`
//! 3. CLI flags (`-v` → debug)
//! 4. Default level: `warn`
//!
//! `--quiet` installs no subscriber at all, so every event is discarded.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Project-specific filter variable.
pub const LOG_ENV: &str = "MINUI_PRESENTER_LOG";

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `--quiet` / `-q`: nothing is logged.
    Quiet,
    /// Default: warnings and above.
    Normal,
    /// `--verbose` / `-v`: debug-level output.
    Verbose,
}

impl Verbosity {
    #[must_use]
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Level used when no environment filter is set. `None` means silent.
    #[must_use]
    pub const fn default_level(self) -> Option<Level> {
        match self {
            Self::Quiet => None,
            Self::Normal => Some(Level::WARN),
            Self::Verbose => Some(Level::DEBUG),
        }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: Verbosity) {
    let Some(level) = verbosity.default_level() else {
        return;
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_target(verbosity == Verbosity::Verbose)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(layer)
        .try_init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    // Unparseable directives fall through instead of failing the run.
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(level.as_str())
}
