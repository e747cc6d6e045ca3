//! Log severity, chosen from the response status code.
//!
//! The mapping is an ordered cascade — the first matching range wins:
//!
//! | Status | Severity | Message |
//! |---|---|---|
//! | ≥ 500 | [`Severity::Error`] | `Server error` |
//! | 400–499 | [`Severity::Warn`] | `Client error` |
//! | 300–399 | [`Severity::Info`] | `Redirection` |
//! | < 300 | [`Severity::Info`] | `Success` |

/// The leveled classification of one access-log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Maps a response status to a severity and message.
pub fn classify(status: u16) -> (Severity, &'static str) {
    match status {
        500.. => (Severity::Error, "Server error"),
        400.. => (Severity::Warn, "Client error"),
        300.. => (Severity::Info, "Redirection"),
        _     => (Severity::Info, "Success"),
    }
}

/// Whether records at this status carry the captured handler error.
///
/// Client and server errors do; redirections and successes never do, even
/// when the wrapped handler failed and a downstream handler recovered.
pub(crate) fn attaches_error(status: u16) -> bool {
    status >= 400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_boundaries() {
        assert_eq!(classify(200), (Severity::Info, "Success"));
        assert_eq!(classify(299), (Severity::Info, "Success"));
        assert_eq!(classify(300), (Severity::Info, "Redirection"));
        assert_eq!(classify(399), (Severity::Info, "Redirection"));
        assert_eq!(classify(400), (Severity::Warn, "Client error"));
        assert_eq!(classify(499), (Severity::Warn, "Client error"));
        assert_eq!(classify(500), (Severity::Error, "Server error"));
        assert_eq!(classify(503), (Severity::Error, "Server error"));
    }

    #[test]
    fn error_attachment_starts_at_400() {
        assert!(!attaches_error(399));
        assert!(attaches_error(400));
        assert!(attaches_error(500));
    }
}
