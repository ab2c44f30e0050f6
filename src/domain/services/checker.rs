//! Checker Service
//!
//! Pure allow-list decision logic. Validates the request shape, resolves
//! the subject's country through a `CountryLookup`, and compares it with
//! the allow-list case-insensitively.

use crate::domain::entities::CheckResult;
use crate::domain::errors::GeoFenceError;
use crate::domain::ports::CountryLookup;
use std::net::IpAddr;
use std::sync::Arc;

pub const EMPTY_ALLOW_LIST: &str = "allowed_countries must contain at least one country";

/// Decides whether a subject IP's country is in an allow-list.
#[derive(Clone)]
pub struct Checker {
    lookup: Arc<dyn CountryLookup>,
}

impl Checker {
    pub fn new(lookup: Arc<dyn CountryLookup>) -> Self {
        Self { lookup }
    }

    /// Check `ip` against `allowed_countries`.
    ///
    /// Steps short-circuit in order: empty allow-list, unparseable IP,
    /// lookup failure. `UnknownSubject` is passed through unchanged; callers
    /// answer it with [`CheckResult::unresolved`].
    ///
    /// The returned country keeps the database's case even though the
    /// comparison ignores case.
    pub fn check(
        &self,
        ip: &str,
        allowed_countries: &[String],
    ) -> Result<CheckResult, GeoFenceError> {
        if allowed_countries.is_empty() {
            return Err(GeoFenceError::invalid_input(EMPTY_ALLOW_LIST));
        }

        let addr: IpAddr = ip
            .parse()
            .map_err(|_| GeoFenceError::invalid_input(format!("invalid IP address: {:?}", ip)))?;

        let country = self.lookup.lookup(addr)?;

        let wanted = country.to_uppercase();
        let allowed = allowed_countries
            .iter()
            .any(|candidate| candidate.to_uppercase() == wanted);

        tracing::debug!(ip = %addr, country = %country, allowed, "check decided");

        Ok(CheckResult::resolved(country, allowed))
    }
}
