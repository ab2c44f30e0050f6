use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    // Listeners
    pub bind_host: String,
    pub http_port: u16,
    pub grpc_port: u16,

    // Country database
    pub db_path: String,

    // Logging
    pub log_level: String,
    pub debug: bool,

    // Shutdown
    pub drain_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            http_port: 8080,
            grpc_port: 50051,
            db_path: "data/GeoLite2-Country.mmdb".to_string(),
            log_level: "info".to_string(),
            debug: false,
            drain_timeout_secs: 5,
        }
    }
}

impl Config {
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.http_port)
    }

    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.grpc_port)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }

    /// Level for the fmt subscriber. `DEBUG` in the environment wins;
    /// unknown names fall back to INFO.
    pub fn tracing_level(&self) -> tracing::Level {
        if self.debug {
            return tracing::Level::DEBUG;
        }
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let defaults = Config::default();

    let bind_host = std::env::var("GEOFENCE_BIND_HOST").unwrap_or(defaults.bind_host);

    let http_port = std::env::var("GEOFENCE_HTTP_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.http_port);

    let grpc_port = std::env::var("GEOFENCE_GRPC_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.grpc_port);

    let db_path = std::env::var("GEOFENCE_DB_PATH").unwrap_or(defaults.db_path);

    let log_level = std::env::var("GEOFENCE_LOG_LEVEL")
        .map(|v| v.trim().to_lowercase())
        .unwrap_or(defaults.log_level);

    let debug = std::env::var("DEBUG").is_ok();

    let drain_timeout_secs = std::env::var("GEOFENCE_DRAIN_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.drain_timeout_secs);

    Ok(Config {
        bind_host,
        http_port,
        grpc_port,
        db_path,
        log_level,
        debug,
        drain_timeout_secs,
    })
}
