//! User-facing message sink.
//!
//! Parsing routines never log through a process-wide singleton. Instead they take a
//! `&dyn MessageSink` argument and report progress (`info`), soft problems (`warn`) and
//! the message of a fatal error (`error`) through it. The fatal path still returns an
//! [`RdxError`](crate::error::RdxError); `error` only makes sure the message reaches the
//! user in the same place as the rest of the run's output.
//!
//! Two sinks ship with the crate:
//!
//! - [`TracingSink`]: forwards everything to `tracing` events. This is what the CLI uses.
//! - [`CaptureSink`](crate::log_capture::CaptureSink): records messages in memory so tests
//!   can assert on warnings.

use tracing::{error, info, warn};

/// Severity of a sink message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum MessageLevel {
    /// Progress information.
    Info,
    /// Soft problem; processing continues.
    Warn,
    /// Message attached to a fatal error.
    Error,
}

/// Capability for reporting user-facing messages from the parser.
pub trait MessageSink {
    /// Report progress.
    fn info(&self, msg: &str);

    /// Report a soft problem. Must never abort.
    fn warn(&self, msg: &str);

    /// Report the message of a fatal error. The caller returns the error itself.
    fn error(&self, msg: &str);

    /// Separator used to break a long message over several lines.
    fn newline(&self) -> &'static str {
        "\n             "
    }
}

/// Sink that forwards every message to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn info(&self, msg: &str) {
        info!(target: "specred", "{}", msg);
    }

    fn warn(&self, msg: &str) {
        warn!(target: "specred", "{}", msg);
    }

    fn error(&self, msg: &str) {
        error!(target: "specred", "{}", msg);
    }
}

/// Report a fatal error through the sink and hand it back for `return Err(...)`.
pub(crate) fn fail(sink: &dyn MessageSink, err: crate::error::RdxError) -> crate::error::RdxError {
    sink.error(&err.to_string());
    err
}
