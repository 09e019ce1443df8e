//! Log sinks that receive every message recorded through
//! [`StatusReport::with_logging`](crate::StatusReport::with_logging).

use crate::message::Level;
use std::error::Error;

/// Receives the rendered text of recorded messages. Stack trace and cause
/// formatting are the sink's business; the report only hands them over.
pub trait LogSink {
    fn record(&self, level: Level, text: &str, cause: Option<&(dyn Error + 'static)>);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn record(&self, _level: Level, _text: &str, _cause: Option<&(dyn Error + 'static)>) {}
}

/// Emits through `tracing` at the matching level, tagged with `source`.
#[derive(Debug, Clone)]
pub struct TracingSink {
    source: String,
}

impl TracingSink {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("status")
    }
}

macro_rules! emit {
    ($mac:ident, $source:expr, $text:expr, $cause:expr) => {
        match $cause {
            Some(cause) => tracing::$mac!(source = $source, cause = %cause, "{}", $text),
            None => tracing::$mac!(source = $source, "{}", $text),
        }
    };
}

impl LogSink for TracingSink {
    fn record(&self, level: Level, text: &str, cause: Option<&(dyn Error + 'static)>) {
        let source = self.source.as_str();
        match level {
            Level::Debug => emit!(debug, source, text, cause),
            Level::Info => emit!(info, source, text, cause),
            Level::Warn => emit!(warn, source, text, cause),
            Level::Error => emit!(error, source, text, cause),
        }
    }
}
