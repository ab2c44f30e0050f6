//! geo-fence Library
//!
//! Country allow-list checks for IP addresses, served over HTTP and gRPC
//! from a memory-mapped MaxMind database. Exposed as a library for
//! integration tests and embedding.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod proto;

// Re-export commonly used types
pub use adapters::outbound::{GeoStore, MaxMindBackend, StaticBackend};
pub use application::{CheckOutcome, GeoFenceService, HealthReporter};
pub use config::{load_config, Config};
pub use domain::entities::{CheckRequest, CheckResult};
pub use domain::errors::{BackendError, GeoFenceError};
pub use domain::ports::{CountryLookup, LookupBackend};
pub use domain::services::Checker;
pub use infrastructure::{ServiceSupervisor, ShutdownController, SupervisorState};
