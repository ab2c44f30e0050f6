//! Check Outcome
//!
//! Classifies the result of a check into the three answers every transport
//! gives: a decision, a rejection of the caller's input, or an internal
//! failure. Each transport encodes these with its own status codes; none of
//! them inspects a `GeoFenceError` directly.

use crate::domain::entities::CheckResult;
use crate::domain::errors::GeoFenceError;

/// Message returned to callers for any server-side failure.
pub const INTERNAL_ERROR: &str = "internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A decision, including "not allowed" for unresolvable subjects.
    Decided(CheckResult),
    /// The caller sent something unusable; the message is safe to return.
    Rejected(String),
    /// Server-side failure. Details have been logged, not returned.
    Failed,
}

impl CheckOutcome {
    /// Request framing could not be decoded.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

impl From<Result<CheckResult, GeoFenceError>> for CheckOutcome {
    fn from(result: Result<CheckResult, GeoFenceError>) -> Self {
        match result {
            Ok(decision) => Self::Decided(decision),
            Err(GeoFenceError::UnknownSubject) => {
                tracing::debug!("subject not in database, denying");
                Self::Decided(CheckResult::unresolved())
            }
            Err(GeoFenceError::InvalidInput(msg)) => {
                tracing::info!(reason = %msg, "rejected check request");
                Self::Rejected(msg)
            }
            Err(GeoFenceError::BackendFailure(detail)) => {
                tracing::error!(error = %detail, "check failed");
                Self::Failed
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_decision_passes_through() {
        let decision = CheckResult::resolved("US".to_string(), true);
        assert_eq!(
            CheckOutcome::from(Ok(decision.clone())),
            CheckOutcome::Decided(decision)
        );
    }

    #[test]
    fn test_unknown_subject_is_a_denial() {
        let outcome = CheckOutcome::from(Err(GeoFenceError::UnknownSubject));
        assert_eq!(outcome, CheckOutcome::Decided(CheckResult::unresolved()));
    }

    #[test]
    #[traced_test]
    fn test_unknown_subject_is_not_logged_as_error() {
        let _ = CheckOutcome::from(Err(GeoFenceError::UnknownSubject));
        assert!(!logs_contain("ERROR"));
        assert!(!logs_contain("check failed"));
    }

    #[test]
    fn test_invalid_input_keeps_message() {
        let outcome = CheckOutcome::from(Err(GeoFenceError::invalid_input("bad ip")));
        assert_eq!(outcome, CheckOutcome::Rejected("bad ip".to_string()));
    }

    #[test]
    #[traced_test]
    fn test_backend_failure_hides_detail() {
        let outcome = CheckOutcome::from(Err(GeoFenceError::BackendFailure(
            "DecodingError: bad pointer".to_string(),
        )));
        assert_eq!(outcome, CheckOutcome::Failed);
        assert!(logs_contain("DecodingError: bad pointer"));
    }

    #[test]
    fn test_malformed_is_rejection() {
        assert_eq!(
            CheckOutcome::malformed("malformed JSON"),
            CheckOutcome::Rejected("malformed JSON".to_string())
        );
    }
}
