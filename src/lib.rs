//! # reqlog
//!
//! Access-log middleware for tower HTTP services.
//! One request in, one structured log record out. Nothing more.
//!
//! ## The contract
//!
//! Your framework routes, parses, and chains handlers. Your subscriber
//! formats and ships log output. reqlog sits between the two and does the
//! only part that is its business: wrap a handler, time the call, read the
//! response, emit exactly one leveled record — latency, status, request
//! line, client IP, body size, user agent, correlation ID, and whatever
//! fields your application adds.
//!
//! - **Severity from status** — `5xx` → error `"Server error"`, `4xx` →
//!   warn `"Client error"`, `3xx` → info `"Redirection"`, everything else →
//!   info `"Success"`.
//! - **Skip predicate** — health probes don't need an audit trail.
//! - **Handler errors consumed, never lost** — a failing handler is mapped
//!   to a client response by an [`ErrorResponder`] and lands in the record;
//!   the middleware itself always resolves `Ok`.
//! - **Two logger capabilities** — [`TracingSink`] for plain structured
//!   events, [`SpanSink`] to attach records to the request's trace span.
//!   One algorithm, swappable emission.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use reqlog::{Config, Field, RequestInfo, RequestLoggerLayer};
//! use tower::ServiceBuilder;
//!
//! let layer = RequestLoggerLayer::new().config(
//!     Config::new()
//!         .skip_when(|req: &RequestInfo| req.uri().path() == "/healthz")
//!         .custom_fields(|req: &RequestInfo| {
//!             vec![Field::str("path", req.uri().path())]
//!         }),
//! );
//!
//! # fn handler() -> impl tower::Service<
//! #     http::Request<String>,
//! #     Response = http::Response<http_body_util::Full<bytes::Bytes>>,
//! #     Error = std::convert::Infallible,
//! # > + Clone {
//! #     tower::service_fn(|_req| async {
//! #         Ok(http::Response::new(http_body_util::Full::new(bytes::Bytes::new())))
//! #     })
//! # }
//! let service = ServiceBuilder::new().layer(layer).service(handler());
//! # let _ = service;
//! ```
//!
//! See `demos/basic.rs` for the layer wired into a hyper server, including
//! the [`RemoteAddr`] extension that feeds the client-IP field.

mod config;
mod error;
mod field;
mod middleware;
mod record;
mod severity;
mod sink;

pub use config::{Config, FieldProducer, LogAll, NoFields, SkipPredicate};
pub use error::{BoxError, ErrorResponder, InternalServerError};
pub use field::{Field, FieldValue};
pub use middleware::{RequestLogger, RequestLoggerLayer};
pub use record::{Record, RemoteAddr, RequestInfo, X_REQUEST_ID};
pub use severity::{Severity, classify};
pub use sink::{LogSink, SpanSink, TracingSink};
