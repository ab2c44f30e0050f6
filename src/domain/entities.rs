//! Domain Entities - Core business objects
//!
//! A check request names a subject IP and the countries it may come from;
//! a check result records the decision and the resolved country.

use serde::{Deserialize, Serialize};

/// Request to check a subject IP against an allow-list.
///
/// Both fields default to empty when absent from a decoded body, so a
/// request without `allowed_countries` is rejected by the checker rather
/// than by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Address being evaluated (IPv4 or IPv6, textual form)
    #[serde(default)]
    pub ip_address: String,
    /// ISO 3166-1 alpha-2 codes considered permitted, any case
    #[serde(default)]
    pub allowed_countries: Vec<String>,
}

impl CheckRequest {
    pub fn new(ip_address: impl Into<String>, allowed_countries: Vec<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            allowed_countries,
        }
    }
}

/// Outcome of a successful check.
///
/// Immutable once built: `allowed` is only ever true when `country` is
/// non-empty and matched an allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    allowed: bool,
    country: String,
}

impl CheckResult {
    /// Decision for a subject whose country was resolved.
    pub(crate) fn resolved(country: String, allowed: bool) -> Self {
        Self {
            allowed: allowed && !country.is_empty(),
            country,
        }
    }

    /// Decision for a subject the database has no country for.
    pub fn unresolved() -> Self {
        Self {
            allowed: false,
            country: String::new(),
        }
    }

    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// Country code exactly as the database returned it, or empty.
    pub fn country(&self) -> &str {
        &self.country
    }
}
