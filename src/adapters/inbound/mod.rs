mod grpc_server;
mod http_server;
mod request_log;

pub use grpc_server::{GeoFenceGrpcService, GrpcServer, HealthGrpcService};
pub use http_server::{router, ErrorResponse, HealthResponse, HttpServer};
pub use request_log::{RequestLog, RequestLogLayer};
