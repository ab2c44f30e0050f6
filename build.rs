//! Generates the tonic client and server stubs for the gRPC surface.
//!
//! Messages are hand-written `prost` structs in `src/proto.rs`, so the
//! stubs are produced with the manual builder and no `protoc` is needed.
//! `proto/geofence.proto` documents the same schema for other clients.

use tonic_build::manual::{Builder, Method, Service};

const PACKAGE: &str = "geofence.v1";
const CODEC: &str = "tonic::codec::ProstCodec";

fn unary(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(input)
        .output_type(output)
        .codec_path(CODEC)
        .build()
}

fn main() {
    let geo_fence = Service::builder()
        .name("GeoFenceService")
        .package(PACKAGE)
        .method(unary(
            "check_access",
            "CheckAccess",
            "crate::proto::CheckRequest",
            "crate::proto::CheckResponse",
        ))
        .build();

    let health = Service::builder()
        .name("HealthService")
        .package(PACKAGE)
        .method(unary(
            "check_health",
            "CheckHealth",
            "crate::proto::HealthRequest",
            "crate::proto::HealthResponse",
        ))
        .build();

    Builder::new().compile(&[geo_fence, health]);

    println!("cargo:rerun-if-changed=build.rs");
}
