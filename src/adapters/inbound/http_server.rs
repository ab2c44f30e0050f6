//! HTTP API Server
//!
//! JSON over HTTP: `POST /v1/check`, `GET /health`, `GET /ready`.

use crate::adapters::inbound::RequestLogLayer;
use crate::application::{CheckOutcome, GeoFenceService, INTERNAL_ERROR};
use crate::domain::entities::CheckRequest;
use crate::infrastructure::ShutdownController;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Body of every non-decision response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of the health endpoints.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

fn error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: msg.into() })).into_response()
}

impl IntoResponse for CheckOutcome {
    fn into_response(self) -> Response {
        match self {
            CheckOutcome::Decided(result) => (StatusCode::OK, Json(result)).into_response(),
            CheckOutcome::Rejected(msg) => error(StatusCode::BAD_REQUEST, msg),
            CheckOutcome::Failed => error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR),
        }
    }
}

/// Build the router with request logging.
pub fn router(service: Arc<GeoFenceService>, shutdown: ShutdownController) -> Router {
    Router::new()
        .route("/v1/check", post(check_handler).fallback(method_not_allowed))
        .route("/health", get(liveness_handler).fallback(method_not_allowed))
        .route("/ready", get(readiness_handler).fallback(method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(RequestLogLayer::new("http", shutdown))
        .with_state(service)
}

/// HTTP adapter bound to a listener.
pub struct HttpServer {
    listener: TcpListener,
    app: Router,
}

impl HttpServer {
    pub fn new(
        listener: TcpListener,
        service: Arc<GeoFenceService>,
        shutdown: ShutdownController,
    ) -> Self {
        Self {
            listener,
            app: router(service, shutdown),
        }
    }

    /// Serve until `stop` resolves, then stop accepting and wait for open
    /// requests. The caller bounds that wait.
    pub async fn serve<F>(self, stop: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.listener.local_addr()?;
        tracing::info!(%addr, "HTTP server listening");

        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(stop)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn check_handler(State(service): State<Arc<GeoFenceService>>, body: Bytes) -> Response {
    let request: CheckRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::info!(error = %e, "failed to decode request body");
            return CheckOutcome::malformed("malformed JSON").into_response();
        }
    };

    service.check(&request).into_response()
}

async fn liveness_handler(State(service): State<Arc<GeoFenceService>>) -> Response {
    let status = service.health().liveness();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
        }),
    )
        .into_response()
}

async fn readiness_handler(State(service): State<Arc<GeoFenceService>>) -> Response {
    match service.health().readiness() {
        Ok(status) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: status.to_string(),
            }),
        )
            .into_response(),
        Err(reason) => error(StatusCode::SERVICE_UNAVAILABLE, reason),
    }
}

async fn method_not_allowed() -> Response {
    error(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}
