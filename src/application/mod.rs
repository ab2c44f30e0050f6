//! Application Layer
//!
//! The use cases both transports share: the check with its outcome
//! classification, and the health probes.

mod geofence_service;
mod health;
mod outcome;

pub use geofence_service::GeoFenceService;
pub use health::{HealthReporter, NOT_READY};
pub use outcome::{CheckOutcome, INTERNAL_ERROR};
