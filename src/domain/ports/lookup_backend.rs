//! Lookup Backend Port
//!
//! Defines the interface for the IP-to-country database a store wraps.

use crate::domain::errors::BackendError;
use std::net::IpAddr;

/// Read-only IP-to-country database.
///
/// This is an outbound port that abstracts the database format.
/// Implementations must be safe to query from many tasks at once and must
/// not mutate state observable between calls.
pub trait LookupBackend: Send + Sync {
    /// Country code for `ip`, or `None` if the database has no record.
    fn country(&self, ip: IpAddr) -> Result<Option<String>, BackendError>;

    /// Short description for startup logs.
    fn describe(&self) -> String {
        "lookup backend".to_string()
    }
}
