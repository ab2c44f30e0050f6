//! Static Lookup Backend
//!
//! Deterministic in-memory table of address -> country. Used in tests and
//! wherever a real database file is not available.

use crate::domain::errors::BackendError;
use crate::domain::ports::LookupBackend;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

/// Fixed address table. Addresses not in the table have no record;
/// addresses registered with [`StaticBackend::with_failure`] fail the lookup.
#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    countries: HashMap<IpAddr, String>,
    failures: HashSet<IpAddr>,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, ip: IpAddr, iso_code: impl Into<String>) -> Self {
        self.countries.insert(ip, iso_code.into());
        self
    }

    pub fn with_failure(mut self, ip: IpAddr) -> Self {
        self.failures.insert(ip);
        self
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl LookupBackend for StaticBackend {
    fn country(&self, ip: IpAddr) -> Result<Option<String>, BackendError> {
        if self.failures.contains(&ip) {
            return Err(BackendError::Lookup(format!("record for {} is unreadable", ip)));
        }
        Ok(self.countries.get(&ip).cloned())
    }

    fn describe(&self) -> String {
        if self.is_empty() {
            return "static table (empty)".to_string();
        }
        format!("static table ({} entries)", self.len())
    }
}
