//! Health Reporter
//!
//! Liveness and readiness probes shared by both transports. Readiness is
//! recomputed from the store on every call; nothing is cached.

use crate::adapters::outbound::GeoStore;
use std::sync::Arc;

pub const NOT_READY: &str = "database not ready";

#[derive(Clone, Default)]
pub struct HealthReporter {
    store: Option<Arc<GeoStore>>,
}

impl HealthReporter {
    pub fn new(store: Option<Arc<GeoStore>>) -> Self {
        Self { store }
    }

    /// Always "up" while the process answers.
    pub fn liveness(&self) -> &'static str {
        "up"
    }

    /// `Ok("ready")` while the store is attached and open.
    pub fn readiness(&self) -> Result<&'static str, &'static str> {
        match &self.store {
            Some(store) if store.is_open() => Ok("ready"),
            _ => {
                tracing::warn!(reason = NOT_READY, "readiness check failed");
                Err(NOT_READY)
            }
        }
    }
}
