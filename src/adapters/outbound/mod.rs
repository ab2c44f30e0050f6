mod geo_store;
mod maxmind_backend;
mod static_backend;

pub use geo_store::GeoStore;
pub use maxmind_backend::MaxMindBackend;
pub use static_backend::StaticBackend;
