//! Middleware configuration.
//!
//! Two knobs, both optional:
//!
//! - a **skip predicate** — bypass logging for matching requests (health
//!   probes are the usual suspects);
//! - a **custom field producer** — append application fields to every
//!   record, after the fixed set, in the order produced.
//!
//! Plain closures work for both:
//!
//! ```rust
//! use reqlog::{Config, Field};
//!
//! let config = Config::new()
//!     .skip_when(|req: &reqlog::RequestInfo| req.uri().path() == "/healthz")
//!     .custom_fields(|req: &reqlog::RequestInfo| {
//!         vec![Field::str("path", req.uri().path())]
//!     });
//! ```

use std::sync::Arc;

use crate::field::Field;
use crate::record::RequestInfo;

// ── Strategies ────────────────────────────────────────────────────────────────

/// Per-request decision to bypass logging.
///
/// When this returns `true` the wrapped service still runs and its outcome
/// is returned unchanged — only the log record is suppressed.
pub trait SkipPredicate: Send + Sync {
    fn should_skip(&self, req: &RequestInfo) -> bool;
}

/// The default predicate: never skips.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAll;

impl SkipPredicate for LogAll {
    fn should_skip(&self, _req: &RequestInfo) -> bool {
        false
    }
}

impl<F> SkipPredicate for F
where
    F: Fn(&RequestInfo) -> bool + Send + Sync,
{
    fn should_skip(&self, req: &RequestInfo) -> bool {
        self(req)
    }
}

/// Produces application fields appended to every record.
pub trait FieldProducer: Send + Sync {
    fn fields(&self, req: &RequestInfo) -> Vec<Field>;
}

/// The default producer: no custom fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFields;

impl FieldProducer for NoFields {
    fn fields(&self, _req: &RequestInfo) -> Vec<Field> {
        Vec::new()
    }
}

impl<F> FieldProducer for F
where
    F: Fn(&RequestInfo) -> Vec<Field> + Send + Sync,
{
    fn fields(&self, req: &RequestInfo) -> Vec<Field> {
        self(req)
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

/// Immutable-after-construction middleware configuration.
///
/// [`Config::new`] returns a fresh default value every time — there is no
/// shared process-wide default to mutate.
#[derive(Clone)]
pub struct Config {
    skip: Arc<dyn SkipPredicate>,
    custom: Arc<dyn FieldProducer>,
}

impl Config {
    /// The default configuration: log every request, no custom fields.
    pub fn new() -> Self {
        Self {
            skip: Arc::new(LogAll),
            custom: Arc::new(NoFields),
        }
    }

    /// Replaces the skip predicate. Returns `self` for chaining.
    pub fn skip_when(mut self, predicate: impl SkipPredicate + 'static) -> Self {
        self.skip = Arc::new(predicate);
        self
    }

    /// Replaces the custom field producer. Returns `self` for chaining.
    pub fn custom_fields(mut self, producer: impl FieldProducer + 'static) -> Self {
        self.custom = Arc::new(producer);
        self
    }

    pub(crate) fn should_skip(&self, req: &RequestInfo) -> bool {
        self.skip.should_skip(req)
    }

    pub(crate) fn produce_fields(&self, req: &RequestInfo) -> Vec<Field> {
        self.custom.fields(req)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> RequestInfo {
        let req = http::Request::builder().uri("/healthz").body(()).unwrap();
        RequestInfo::from_request(&req)
    }

    #[test]
    fn default_never_skips_and_adds_no_fields() {
        let config = Config::new();
        assert!(!config.should_skip(&probe()));
        assert!(config.produce_fields(&probe()).is_empty());
    }

    #[test]
    fn closures_act_as_strategies() {
        let config = Config::new()
            .skip_when(|req: &RequestInfo| req.uri().path() == "/healthz")
            .custom_fields(|req: &RequestInfo| vec![Field::str("path", req.uri().path())]);

        assert!(config.should_skip(&probe()));
        let fields = config.produce_fields(&probe());
        assert_eq!(fields, vec![Field::str("path", "/healthz")]);
    }
}
