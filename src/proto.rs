//! gRPC wire types for the `geofence.v1` package.
//!
//! The service stubs (`geo_fence_service_server`, `health_service_client`, ...)
//! are generated by `build.rs`; the messages below mirror `proto/geofence.proto`.

#![allow(clippy::derive_partial_eq_without_eq)]

#[derive(Clone, PartialEq, prost::Message)]
pub struct CheckRequest {
    #[prost(string, tag = "1")]
    pub ip_address: String,
    #[prost(string, repeated, tag = "2")]
    pub allowed_countries: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CheckResponse {
    #[prost(bool, tag = "1")]
    pub allowed: bool,
    #[prost(string, tag = "2")]
    pub country: String,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct HealthRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HealthResponse {
    #[prost(string, tag = "1")]
    pub status: String,
}

include!(concat!(env!("OUT_DIR"), "/geofence.v1.GeoFenceService.rs"));
include!(concat!(env!("OUT_DIR"), "/geofence.v1.HealthService.rs"));
