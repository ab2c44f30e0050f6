//! Domain Layer
//!
//! Check decision types, the error taxonomy, outbound ports and the
//! allow-list decision service. Nothing here knows about a transport.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
