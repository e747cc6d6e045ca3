//! The request-logging middleware.
//!
//! [`RequestLoggerLayer`] wraps any `tower::Service` taking an
//! `http::Request` and emits exactly one leveled record per request it
//! doesn't skip. Per invocation:
//!
//! 1. Snapshot the request line and headers; consult the skip predicate.
//!    A skipped request runs the inner service and returns its outcome
//!    unchanged — no record.
//! 2. Start the clock, await the inner service, stop the clock.
//! 3. A failed inner service is handed to the [`ErrorResponder`]; the
//!    response it builds is what the client sees. The error itself is kept
//!    for the record and never re-raised.
//! 4. Build the record, append producer fields, classify the status, emit
//!    through the [`LogSink`]. Done.
//!
//! ```rust,no_run
//! use reqlog::{Config, RequestInfo, RequestLoggerLayer};
//!
//! let layer = RequestLoggerLayer::new().config(
//!     Config::new().skip_when(|req: &RequestInfo| req.uri().path() == "/healthz"),
//! );
//! # let _ = layer;
//! ```

use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use http::{Request, Response};
use http_body::Body;
use tower::{Layer, Service};
use tracing::Span;

use crate::config::Config;
use crate::error::{BoxError, ErrorResponder, InternalServerError};
use crate::record::{Record, RequestInfo};
use crate::severity::{attaches_error, classify};
use crate::sink::{LogSink, TracingSink};

/// A heap-allocated, type-erased future.
///
/// `Pin<Box<…>>` because the runtime polls futures in place; boxing keeps
/// the `Service::Future` associated type independent of the inner service's
/// concrete future.
type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

// ── Layer ─────────────────────────────────────────────────────────────────────

/// Builds [`RequestLogger`] services around inner handlers.
///
/// Construction picks the logger capability; [`config`](Self::config) and
/// [`error_responder`](Self::error_responder) replace the defaults:
///
/// ```rust,no_run
/// use reqlog::{RequestLoggerLayer, SpanSink};
///
/// // Plain structured logging:
/// let plain = RequestLoggerLayer::new();
///
/// // Trace-aware — records attach to the request's span when one exists:
/// let traced = RequestLoggerLayer::with_sink(SpanSink);
/// # let _ = (plain, traced);
/// ```
#[derive(Clone)]
pub struct RequestLoggerLayer {
    sink: Arc<dyn LogSink>,
    config: Config,
    responder: Arc<dyn ErrorResponder>,
}

impl RequestLoggerLayer {
    /// A layer logging through [`TracingSink`] with default configuration.
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }

    /// A layer logging through the given sink.
    pub fn with_sink(sink: impl LogSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            config: Config::new(),
            responder: Arc::new(InternalServerError),
        }
    }

    /// Replaces the configuration. Returns `self` for chaining.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replaces the error responder. Returns `self` for chaining.
    pub fn error_responder(mut self, responder: impl ErrorResponder + 'static) -> Self {
        self.responder = Arc::new(responder);
        self
    }
}

impl Default for RequestLoggerLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogger {
            inner,
            sink: Arc::clone(&self.sink),
            config: self.config.clone(),
            responder: Arc::clone(&self.responder),
        }
    }
}

// ── Service ───────────────────────────────────────────────────────────────────

/// The wrapping service produced by [`RequestLoggerLayer`].
#[derive(Clone)]
pub struct RequestLogger<S> {
    inner: S,
    sink: Arc<dyn LogSink>,
    config: Config,
    responder: Arc<dyn ErrorResponder>,
}

impl<S, B, RB> Service<Request<B>> for RequestLogger<S>
where
    S: Service<Request<B>, Response = Response<RB>> + Clone + Send + 'static,
    S::Error: Into<BoxError> + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
    RB: Body + From<Bytes> + Send + 'static,
{
    type Response = Response<RB>;
    type Error = S::Error;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // Take the service that `poll_ready` reported ready; leave a fresh
        // clone in its place for the next call.
        let clone = self.inner.clone();
        let mut inner = mem::replace(&mut self.inner, clone);

        let info = RequestInfo::from_request(&req);
        if self.config.should_skip(&info) {
            // Outcome passes through unchanged, error included. No record.
            return Box::pin(inner.call(req));
        }

        let span = req.extensions().get::<Span>().cloned();
        let sink = Arc::clone(&self.sink);
        let config = self.config.clone();
        let responder = Arc::clone(&self.responder);

        Box::pin(async move {
            let start = Instant::now();
            let outcome = inner.call(req).await;
            let latency = start.elapsed();

            let (response, error) = match outcome {
                Ok(response) => (response, None),
                Err(e) => {
                    let error: BoxError = e.into();
                    let (status, body) = responder.respond(&error);
                    let mut response = Response::new(RB::from(body));
                    *response.status_mut() = status;
                    (response, Some(error))
                }
            };

            let mut record = Record::build(&info, &response, latency);
            record.append_custom(config.produce_fields(&info));

            let status = record.status();
            let (severity, message) = classify(status);
            let attached = if attaches_error(status) { error.as_ref() } else { None };
            sink.emit(severity, message, &record, attached, span.as_ref());

            Ok(response)
        })
    }
}
