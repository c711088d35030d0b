//! Logging setup for schoolbook.
//!
//! Diagnostics go through `tracing`. Persistence problems are reported here at
//! `warn`/`debug` rather than to the user, since the slot is only a
//! best-effort mirror of the session's list.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the `schools` binary logs, from `-q` up to `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    /// No flag: info and up, such as warnings about failed slot writes.
    #[default]
    Normal,
    /// `-v`: debug, adds slot reads and writes.
    Verbose,
    /// `-vv`: everything.
    Trace,
}

impl Verbosity {
    /// The most detailed level logged at this verbosity.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Install the stderr subscriber for the library and the `schools` binary.
///
/// Logs stay on stderr so `list --format json` and `status --json` output
/// can be piped. A `RUST_LOG` filter, when set, replaces the one derived
/// from `verbosity`. Calling this more than once is harmless.
///
/// # Examples
///
/// ```no_run
/// use schoolbook::{init_logging, logging::Verbosity};
///
/// // Equivalent of `schools -v ...`
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let level = verbosity.to_level_filter();
    let default_filter = format!("schoolbook={level},schools={level}");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time(),
    );

    // A subscriber may already be installed (tests, embedding).
    let _ = subscriber.try_init();
}

/// Route test logs through the test harness, warnings and up.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("schoolbook=warn")
        .with_test_writer()
        .try_init();
}
