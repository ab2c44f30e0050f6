mod country_lookup;
mod lookup_backend;

pub use country_lookup::CountryLookup;
pub use lookup_backend::LookupBackend;
