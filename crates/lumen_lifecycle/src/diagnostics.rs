//! Diagnostic side-channel.
//!
//! The hook registry and the graph report what they are doing through a
//! [`DiagnosticSink`]. Sinks observe; they never influence control flow.
//! [`TracingSink`] forwards to the `tracing` crate and is the default.

use core::fmt;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Verbose developer output.
    Debug,
    /// Normal progress messages.
    Info,
    /// Something unexpected that does not stop the operation.
    Warning,
    /// An operation failed.
    Error,
    /// A failure that leaves the graph unusable.
    Critical,
}

impl Severity {
    /// Returns the lowercase label of this severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver for diagnostic messages.
pub trait DiagnosticSink: Send + Sync {
    /// Records a message at the given severity.
    fn emit(&self, severity: Severity, message: &str);
}

/// Sink that forwards messages to `tracing`.
///
/// `Critical` has no `tracing` level of its own; it is logged at `ERROR`
/// with a `critical = true` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
            Severity::Critical => tracing::error!(critical = true, "{message}"),
        }
    }
}

/// Sink that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _severity: Severity, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_ordered_by_urgency() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Critical.to_string(), "critical");
    }

    #[test]
    fn sinks_accept_every_severity() {
        let sinks: [&dyn DiagnosticSink; 2] = [&TracingSink, &NullSink];
        for sink in sinks {
            for severity in [
                Severity::Debug,
                Severity::Info,
                Severity::Warning,
                Severity::Error,
                Severity::Critical,
            ] {
                sink.emit(severity, "message");
            }
        }
    }
}
