//! Narrow, injected logging sink (spec §9: "treat them as injected
//! sinks the core calls through narrow interfaces... lets the core be
//! unit-tested without I/O"). `depgraph-core` never logs at all — only
//! the Connection Handler and Server Engine do — so the sink lives
//! here rather than in the protocol-only crate.

/// Severity of a log record. The three levels spec §4.4/§7 actually
/// prescribes: `WARN` for connection failures and cancellation, `INFO`
/// for parse errors (optional), `ERROR` for bind failure and a fatal
/// accept-loop error (both of which also end the process).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// One method to emit a record, per spec §9. Implementations must be
/// `Send + Sync` since handlers run on arbitrary tokio worker threads.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Installed when `--quiet` is passed: drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Forwards to the `tracing` macros. Safe to use even with no
/// subscriber installed — the records are simply dropped by tracing's
/// default no-op dispatcher in that case.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{message}"),
            Level::Warn => tracing::warn!("{message}"),
            Level::Error => tracing::error!("{message}"),
        }
    }
}
