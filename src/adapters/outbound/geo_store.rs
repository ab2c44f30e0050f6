//! GeoStore
//!
//! Owns the lookup backend for the lifetime of the process and translates
//! backend answers into the domain error taxonomy.

use crate::adapters::outbound::MaxMindBackend;
use crate::domain::errors::GeoFenceError;
use crate::domain::ports::{CountryLookup, LookupBackend};
use parking_lot::RwLock;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

/// Country lookups over a single backend handle.
///
/// The handle is attached once at construction and released once by
/// [`GeoStore::close`]. Lookups take a reference to the handle and drop the
/// lock before querying, so a lookup already in flight when the store is
/// closed still completes against the old handle.
pub struct GeoStore {
    backend: RwLock<Option<Arc<dyn LookupBackend>>>,
}

impl GeoStore {
    /// Open the MaxMind database at `path`. Does not retry.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GeoFenceError> {
        let path = path.as_ref();
        let backend = MaxMindBackend::open(path)?;
        tracing::info!(
            path = %path.display(),
            database = %backend.describe(),
            "GeoIP database opened"
        );
        Ok(Self::with_backend(Arc::new(backend)))
    }

    /// Wrap an already-open backend.
    pub fn with_backend(backend: Arc<dyn LookupBackend>) -> Self {
        Self {
            backend: RwLock::new(Some(backend)),
        }
    }

    /// Whether the backend handle is still attached.
    pub fn is_open(&self) -> bool {
        self.backend.read().is_some()
    }

    /// Release the backend handle. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let released = self.backend.write().take();
        match released {
            Some(backend) => {
                tracing::info!(database = %backend.describe(), "GeoIP database closed");
                true
            }
            None => false,
        }
    }

    fn handle(&self) -> Option<Arc<dyn LookupBackend>> {
        self.backend.read().clone()
    }
}

impl CountryLookup for GeoStore {
    fn lookup(&self, ip: IpAddr) -> Result<String, GeoFenceError> {
        let backend = self
            .handle()
            .ok_or_else(|| GeoFenceError::BackendFailure("database closed".to_string()))?;

        match backend.country(ip)? {
            Some(country) => Ok(country),
            None => Err(GeoFenceError::UnknownSubject),
        }
    }
}

impl Drop for GeoStore {
    fn drop(&mut self) {
        self.close();
    }
}
