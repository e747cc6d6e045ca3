//! Handler-error plumbing.
//!
//! The middleware never re-raises a wrapped service's error: the error is
//! handed to an [`ErrorResponder`] — the hook where the host's error-page
//! logic lives — and the response it produces is what the client sees and
//! what the log record describes. Downstream error handling therefore still
//! runs, and the middleware itself always resolves successfully on the
//! logging path.

use bytes::Bytes;
use http::StatusCode;

/// Type-erased error produced by a wrapped service.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Maps a handler error to the status and body the client receives.
///
/// Plug the host framework's error-page logic in here; the default,
/// [`InternalServerError`], answers every failure with a bare `500`.
pub trait ErrorResponder: Send + Sync {
    fn respond(&self, error: &BoxError) -> (StatusCode, Bytes);
}

/// The default responder: `500 Internal Server Error`, empty body.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalServerError;

impl ErrorResponder for InternalServerError {
    fn respond(&self, _error: &BoxError) -> (StatusCode, Bytes) {
        (StatusCode::INTERNAL_SERVER_ERROR, Bytes::new())
    }
}

impl<F> ErrorResponder for F
where
    F: Fn(&BoxError) -> (StatusCode, Bytes) + Send + Sync,
{
    fn respond(&self, error: &BoxError) -> (StatusCode, Bytes) {
        self(error)
    }
}
