//! MaxMind Lookup Backend
//!
//! Implements LookupBackend over a memory-mapped MaxMind country database
//! (GeoLite2-Country, GeoIP2-Country or any MMDB with `country.iso_code`).

use crate::domain::errors::BackendError;
use crate::domain::ports::LookupBackend;
use maxminddb::{MaxMindDBError, Mmap, Reader};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;

/// MaxMind database reader backed by a read-only memory map.
pub struct MaxMindBackend {
    reader: Reader<Mmap>,
}

impl MaxMindBackend {
    /// Memory-map the database at `path`.
    ///
    /// Fails on a missing or unreadable file and on any file whose metadata
    /// or search tree does not parse.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        let reader = Reader::open_mmap(path).map_err(|e| match e {
            MaxMindDBError::IoError(reason) => BackendError::Open {
                path: path.display().to_string(),
                reason,
            },
            other => BackendError::Corrupt(other.to_string()),
        })?;
        Ok(Self { reader })
    }

    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }
}

impl LookupBackend for MaxMindBackend {
    fn country(&self, ip: IpAddr) -> Result<Option<String>, BackendError> {
        #[derive(Debug, Deserialize)]
        struct Country {
            iso_code: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct CountryResp {
            country: Option<Country>,
        }

        match self.reader.lookup::<CountryResp>(ip) {
            Ok(resp) => Ok(resp
                .country
                .and_then(|c| c.iso_code)
                .filter(|iso| !iso.is_empty())),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
            Err(e) => Err(BackendError::Lookup(e.to_string())),
        }
    }

    fn describe(&self) -> String {
        let meta = &self.reader.metadata;
        format!(
            "{} (ipv{}, build_epoch={}, nodes={})",
            self.database_type(),
            meta.ip_version,
            meta.build_epoch,
            meta.node_count
        )
    }
}
