//! Request logging middleware
//!
//! One tower layer wraps both the HTTP router and the gRPC server. It logs
//! transport, method, path (the RPC name for gRPC), status and duration for
//! every request, and marks the request in flight for the shutdown drain.
//! The response passes through untouched.

use crate::infrastructure::ShutdownController;
use axum::http::{Request, Response};
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};

#[derive(Clone)]
pub struct RequestLogLayer {
    transport: &'static str,
    shutdown: ShutdownController,
}

impl RequestLogLayer {
    pub fn new(transport: &'static str, shutdown: ShutdownController) -> Self {
        Self {
            transport,
            shutdown,
        }
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLog {
            inner,
            transport: self.transport,
            shutdown: self.shutdown.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RequestLog<S> {
    inner: S,
    transport: &'static str,
    shutdown: ShutdownController,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLog<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Use the clone that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let transport = self.transport;
        let guard = self.shutdown.request_guard();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let response = inner.call(req).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match &response {
                Ok(resp) => {
                    if transport == "grpc" {
                        // Unary gRPC errors are sent trailers-only, so the code
                        // is a header; successful calls carry it in the trailers.
                        let grpc_status = resp
                            .headers()
                            .get("grpc-status")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("0");
                        tracing::info!(
                            transport,
                            method = %method,
                            path = %path,
                            status = resp.status().as_u16(),
                            grpc_status,
                            duration_ms,
                            "request"
                        );
                    } else {
                        tracing::info!(
                            transport,
                            method = %method,
                            path = %path,
                            status = resp.status().as_u16(),
                            duration_ms,
                            "request"
                        );
                    }
                }
                Err(_) => {
                    tracing::warn!(transport, method = %method, path = %path, duration_ms, "request failed");
                }
            }

            drop(guard);
            response
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use std::convert::Infallible;
    use std::time::Duration;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_logs_and_passes_response_through() {
        let shutdown = ShutdownController::new();
        let svc = RequestLogLayer::new("http", shutdown.clone()).layer(tower::service_fn(
            |_req: Request<Body>| async {
                Ok::<_, Infallible>(
                    Response::builder()
                        .status(StatusCode::IM_A_TEAPOT)
                        .body(Body::from("short and stout"))
                        .unwrap(),
                )
            },
        ));

        let response = svc
            .oneshot(Request::post("/v1/check").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(shutdown.in_flight(), 0);
        assert!(logs_contain("/v1/check"));
        assert!(logs_contain("status=418"));
        assert!(!logs_contain("grpc_status"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_successful_grpc_call_logs_ok_status() {
        let svc = RequestLogLayer::new("grpc", ShutdownController::new()).layer(
            tower::service_fn(|_req: Request<Body>| async {
                Ok::<_, Infallible>(Response::new(Body::empty()))
            }),
        );

        svc.oneshot(
            Request::post("/geofence.v1.HealthService/CheckHealth")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert!(logs_contain("transport=\"grpc\""));
        assert!(logs_contain("grpc_status=\"0\""));
    }

    #[tokio::test]
    async fn test_request_counted_while_in_flight() {
        let shutdown = ShutdownController::new();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let release_rx = std::sync::Arc::new(tokio::sync::Mutex::new(Some(release_rx)));

        let svc = RequestLogLayer::new("http", shutdown.clone()).layer(tower::service_fn(
            move |_req: Request<Body>| {
                let release_rx = release_rx.clone();
                async move {
                    if let Some(rx) = release_rx.lock().await.take() {
                        let _ = rx.await;
                    }
                    Ok::<_, Infallible>(Response::new(Body::empty()))
                }
            },
        ));

        let handle = tokio::spawn(svc.oneshot(Request::get("/health").body(Body::empty()).unwrap()));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(shutdown.in_flight(), 1);

        release_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(shutdown.in_flight(), 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_grpc_status_header_logged() {
        let svc = RequestLogLayer::new("grpc", ShutdownController::new()).layer(
            tower::service_fn(|_req: Request<Body>| async {
                Ok::<_, Infallible>(
                    Response::builder()
                        .header("grpc-status", "3")
                        .body(Body::empty())
                        .unwrap(),
                )
            }),
        );

        svc.oneshot(
            Request::post("/geofence.v1.GeoFenceService/CheckAccess")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert!(logs_contain("CheckAccess"));
        assert!(logs_contain("grpc_status=\"3\""));
    }
}
