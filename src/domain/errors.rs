//! Domain Errors
//!
//! `GeoFenceError` is the only error the checker and the store produce.
//! `BackendError` is what a lookup backend reports before the store
//! translates it.

use thiserror::Error;

/// Errors produced by the decision engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoFenceError {
    /// Caller's fault: malformed IP or empty allow-list. The message is
    /// safe to return to the caller.
    #[error("{0}")]
    InvalidInput(String),

    /// The database holds no country for the subject (private, reserved
    /// or unallocated ranges). An answerable "not allowed", not a failure.
    #[error("ip not found in database")]
    UnknownSubject,

    /// The backend is unavailable or returned garbage. The detail is for
    /// server logs only.
    #[error("lookup backend failure: {0}")]
    BackendFailure(String),
}

impl GeoFenceError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_unknown_subject(&self) -> bool {
        matches!(self, Self::UnknownSubject)
    }
}

impl From<BackendError> for GeoFenceError {
    fn from(err: BackendError) -> Self {
        Self::BackendFailure(err.to_string())
    }
}

/// Errors reported by a lookup backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Database file missing or unreadable.
    #[error("cannot open database {path}: {reason}")]
    Open { path: String, reason: String },

    /// Database structure is invalid.
    #[error("corrupt database: {0}")]
    Corrupt(String),

    /// A single lookup failed (decoding error, bad record).
    #[error("lookup failed: {0}")]
    Lookup(String),
}
