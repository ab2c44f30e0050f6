//! Adapters Layer
//!
//! Inbound adapters expose the service over HTTP and gRPC; outbound
//! adapters provide the country database.

pub mod inbound;
pub mod outbound;
