//! Logger capabilities — where records go.
//!
//! The middleware collects fields and picks a severity; a [`LogSink`] owns
//! the final emission call. Two built-ins cover the common cases:
//!
//! - [`TracingSink`] — one structured `tracing` event per record.
//! - [`SpanSink`] — the trace-aware variant: when the host put a
//!   [`tracing::Span`] on the request, the event is emitted inside it, so
//!   subscriber-side correlation (an OpenTelemetry bridge layer, for
//!   instance) files the record under the request's trace.
//!
//! Implement the trait yourself to ship records anywhere else; the field
//! collection and severity selection upstream of the sink never changes.

use std::fmt;

use tracing::Span;

use crate::error::BoxError;
use crate::field::FieldList;
use crate::record::Record;
use crate::severity::Severity;

/// Accepts one finished access-log record.
///
/// `error` is the captured handler error; it is `Some` only when a handler
/// failed *and* the final status is ≥ 400. `span` is the request's trace
/// span when the host supplied one — plain sinks are free to ignore it.
pub trait LogSink: Send + Sync {
    fn emit(
        &self,
        severity: Severity,
        message: &'static str,
        record: &Record,
        error: Option<&BoxError>,
        span: Option<&Span>,
    );
}

// ── Built-in sinks ────────────────────────────────────────────────────────────

/// Emits each record as a structured [`tracing`] event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(
        &self,
        severity: Severity,
        message: &'static str,
        record: &Record,
        error: Option<&BoxError>,
        _span: Option<&Span>,
    ) {
        emit_event(severity, message, record, error);
    }
}

/// Trace-aware sink: emits inside the request's span when one exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanSink;

impl LogSink for SpanSink {
    fn emit(
        &self,
        severity: Severity,
        message: &'static str,
        record: &Record,
        error: Option<&BoxError>,
        span: Option<&Span>,
    ) {
        match span {
            Some(span) => span.in_scope(|| emit_event(severity, message, record, error)),
            None => emit_event(severity, message, record, error),
        }
    }
}

// ── Shared emission ───────────────────────────────────────────────────────────

/// Renders an absent error as an empty string — the field is always present
/// on warn/error records, mirroring the record's empty-string policy for
/// missing values.
struct MaybeError<'a>(Option<&'a BoxError>);

impl fmt::Display for MaybeError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(e) => write!(f, "{e}"),
            None => Ok(()),
        }
    }
}

/// Event callsites need a fixed shape, so the error field exists only on the
/// warn/error arms and dynamically-named custom fields ride in a single
/// `custom` field, pre-rendered as `k=v` pairs.
macro_rules! access_event {
    ($level:ident, $record:expr, $message:expr) => {
        tracing::$level!(
            target: "reqlog",
            remote_ip  = %$record.remote_ip(),
            latency    = ?$record.latency(),
            host       = %$record.host(),
            request    = %$record.request(),
            status     = $record.status(),
            size       = $record.size(),
            user_agent = %$record.user_agent(),
            request_id = %$record.request_id(),
            custom     = %FieldList($record.custom()),
            "{}",
            $message,
        )
    };
    ($level:ident, $record:expr, $error:expr, $message:expr) => {
        tracing::$level!(
            target: "reqlog",
            remote_ip  = %$record.remote_ip(),
            latency    = ?$record.latency(),
            host       = %$record.host(),
            request    = %$record.request(),
            status     = $record.status(),
            size       = $record.size(),
            user_agent = %$record.user_agent(),
            request_id = %$record.request_id(),
            custom     = %FieldList($record.custom()),
            error      = %MaybeError($error),
            "{}",
            $message,
        )
    };
}

fn emit_event(
    severity: Severity,
    message: &'static str,
    record: &Record,
    error: Option<&BoxError>,
) {
    match severity {
        Severity::Error => access_event!(error, record, error, message),
        Severity::Warn  => access_event!(warn, record, error, message),
        Severity::Info  => access_event!(info, record, message),
    }
}
