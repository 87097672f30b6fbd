//! Tracing setup for the server, the CLI commands and the load-test driver.
//!
//! Besides the crate's own events, the default filter enables axum's
//! extractor rejections (`axum::rejection`, emitted at trace level), so a
//! malformed login or purchase form shows up in the request log with the
//! reason it was refused.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target axum uses when an extractor rejects a request.
const REJECTION_TARGET: &str = "axum::rejection";

/// How much the service logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Requests, logins and booking outcomes.
    #[default]
    Normal,
    /// Adds dataset loading and load-test task details.
    Verbose,
    /// Everything the crate emits.
    Trace,
}

impl Verbosity {
    /// Map the `-q` flag and the number of `-v` flags to a verbosity.
    ///
    /// `-q` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Most detailed level the crate logs at.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is unset.
    ///
    /// Extractor rejections stay visible unless running quiet.
    #[must_use]
    pub fn filter_directives(self) -> String {
        let crate_directive = format!("gudlft={}", self.level());
        match self {
            Self::Quiet => crate_directive,
            _ => format!("{crate_directive},{REJECTION_TARGET}=trace"),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG`, when set, replaces [`Verbosity::filter_directives`]. Calling
/// this again after a subscriber is installed does nothing.
///
/// # Examples
///
/// ```no_run
/// use gudlft::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(1, false));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directives()));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
