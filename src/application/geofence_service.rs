//! GeoFence Service - Application use case
//!
//! The single entry point both transport adapters call. Holds the checker
//! and the health reporter and hands back transport-neutral answers.

use crate::adapters::outbound::GeoStore;
use crate::application::{CheckOutcome, HealthReporter};
use crate::domain::entities::CheckRequest;
use crate::domain::services::Checker;
use std::sync::Arc;

pub struct GeoFenceService {
    checker: Checker,
    health: HealthReporter,
}

impl GeoFenceService {
    pub fn new(checker: Checker, health: HealthReporter) -> Self {
        Self { checker, health }
    }

    /// Wire a checker and health reporter to the same store.
    pub fn from_store(store: Arc<GeoStore>) -> Self {
        Self::new(Checker::new(store.clone()), HealthReporter::new(Some(store)))
    }

    pub fn check(&self, request: &CheckRequest) -> CheckOutcome {
        self.checker
            .check(&request.ip_address, &request.allowed_countries)
            .into()
    }

    pub fn health(&self) -> &HealthReporter {
        &self.health
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::adapters::outbound::StaticBackend;
    use crate::domain::entities::CheckResult;

    fn service() -> (GeoFenceService, Arc<GeoStore>) {
        let backend = StaticBackend::new()
            .with_country("8.8.8.8".parse().unwrap(), "US")
            .with_failure("203.0.113.9".parse().unwrap());
        let store = Arc::new(GeoStore::with_backend(Arc::new(backend)));
        (GeoFenceService::from_store(store.clone()), store)
    }

    fn request(ip: &str, countries: &[&str]) -> CheckRequest {
        CheckRequest::new(ip, countries.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_allowed() {
        let (service, _) = service();
        match service.check(&request("8.8.8.8", &["US", "CA"])) {
            CheckOutcome::Decided(result) => {
                assert!(result.allowed());
                assert_eq!(result.country(), "US");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_subject_is_decided() {
        let (service, _) = service();
        assert_eq!(
            service.check(&request("192.168.1.1", &["US"])),
            CheckOutcome::Decided(CheckResult::unresolved())
        );
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let (service, _) = service();
        assert!(matches!(
            service.check(&request("not-an-ip", &["US"])),
            CheckOutcome::Rejected(_)
        ));
        assert!(matches!(
            service.check(&request("8.8.8.8", &[])),
            CheckOutcome::Rejected(_)
        ));
    }

    #[test]
    fn test_backend_failure() {
        let (service, _) = service();
        assert_eq!(service.check(&request("203.0.113.9", &["US"])), CheckOutcome::Failed);
    }

    #[test]
    fn test_health_follows_store() {
        let (service, store) = service();
        assert!(service.health().readiness().is_ok());
        store.close();
        assert!(service.health().readiness().is_err());
        assert_eq!(service.check(&request("8.8.8.8", &["US"])), CheckOutcome::Failed);
    }
}
