//! Country Lookup Port
//!
//! The narrow capability the checker depends on.

use crate::domain::errors::GeoFenceError;
use std::net::IpAddr;

/// Resolves an IP address to an ISO 3166-1 alpha-2 country code.
///
/// Returns `UnknownSubject` when the address has no country on record and
/// `BackendFailure` when the lookup itself could not be performed.
pub trait CountryLookup: Send + Sync {
    fn lookup(&self, ip: IpAddr) -> Result<String, GeoFenceError>;
}
