//! gRPC Server
//!
//! `geofence.v1.GeoFenceService/CheckAccess` and
//! `geofence.v1.HealthService/CheckHealth` over tonic.

use crate::adapters::inbound::RequestLogLayer;
use crate::application::{CheckOutcome, GeoFenceService, INTERNAL_ERROR};
use crate::domain::entities::CheckRequest as DomainCheckRequest;
use crate::infrastructure::ShutdownController;
use crate::proto::{
    geo_fence_service_server::{GeoFenceService as GeoFenceServiceTrait, GeoFenceServiceServer},
    health_service_server::{HealthService as HealthServiceTrait, HealthServiceServer},
    CheckRequest, CheckResponse, HealthRequest, HealthResponse,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{transport::Server, Request, Response, Status};
use tracing::instrument;

fn reply(outcome: CheckOutcome) -> Result<Response<CheckResponse>, Status> {
    match outcome {
        CheckOutcome::Decided(result) => Ok(Response::new(CheckResponse {
            allowed: result.allowed(),
            country: result.country().to_string(),
        })),
        CheckOutcome::Rejected(msg) => Err(Status::invalid_argument(msg)),
        CheckOutcome::Failed => Err(Status::internal(INTERNAL_ERROR)),
    }
}

/// CheckAccess implementation.
pub struct GeoFenceGrpcService {
    service: Arc<GeoFenceService>,
}

impl GeoFenceGrpcService {
    pub fn new(service: Arc<GeoFenceService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl GeoFenceServiceTrait for GeoFenceGrpcService {
    #[instrument(skip(self, request))]
    async fn check_access(
        &self,
        request: Request<CheckRequest>,
    ) -> Result<Response<CheckResponse>, Status> {
        let req = request.into_inner();
        let request = DomainCheckRequest::new(req.ip_address, req.allowed_countries);
        reply(self.service.check(&request))
    }
}

/// CheckHealth implementation, backed by the same readiness probe as `/ready`.
pub struct HealthGrpcService {
    service: Arc<GeoFenceService>,
}

impl HealthGrpcService {
    pub fn new(service: Arc<GeoFenceService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl HealthServiceTrait for HealthGrpcService {
    async fn check_health(
        &self,
        _request: Request<HealthRequest>,
    ) -> Result<Response<HealthResponse>, Status> {
        match self.service.health().readiness() {
            Ok(status) => Ok(Response::new(HealthResponse {
                status: status.to_string(),
            })),
            Err(reason) => Err(Status::unavailable(reason)),
        }
    }
}

/// gRPC adapter bound to a listener.
pub struct GrpcServer {
    listener: TcpListener,
    service: Arc<GeoFenceService>,
    shutdown: ShutdownController,
}

impl GrpcServer {
    pub fn new(
        listener: TcpListener,
        service: Arc<GeoFenceService>,
        shutdown: ShutdownController,
    ) -> Self {
        Self {
            listener,
            service,
            shutdown,
        }
    }

    /// Serve until `stop` resolves, then drain open calls and return.
    pub async fn serve<F>(self, stop: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.listener.local_addr()?;
        tracing::info!(%addr, "gRPC server listening");

        Server::builder()
            .layer(RequestLogLayer::new("grpc", self.shutdown))
            .add_service(GeoFenceServiceServer::new(GeoFenceGrpcService::new(
                self.service.clone(),
            )))
            .add_service(HealthServiceServer::new(HealthGrpcService::new(self.service)))
            .serve_with_incoming_shutdown(TcpListenerStream::new(self.listener), stop)
            .await?;

        tracing::info!("gRPC server stopped");
        Ok(())
    }
}
