//! Service configuration.

use std::str::FromStr;
use std::time::Duration;

/// Which storage backend to open at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Flat JSON files in the data directory.
    #[default]
    Json,

    /// Embedded SQLite database in the data directory.
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Storage backend (default: json).
    pub store_backend: StoreBackend,

    /// Data directory for the store files (default: "/data/billtrace").
    pub data_dir: String,

    /// Cooldown window between accepted track requests for the same
    /// serial number, in minutes (default: 30).
    pub cooldown_minutes: i64,

    /// Per-provider timeout for geolocation calls, in seconds (default: 4).
    pub provider_timeout_seconds: u64,

    /// Location cache TTL, in seconds (default: 3600).
    pub location_cache_ttl_seconds: u64,

    /// ipapi.co base URL (overridable for tests).
    pub ipapi_base_url: String,

    /// ip-api.com base URL (overridable for tests).
    pub ipapi_com_base_url: String,

    /// Nominatim base URL (overridable for tests).
    pub nominatim_base_url: String,

    /// Optional path to an offline IP prefix table.
    pub geoip_table_path: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_addr: env_or("LISTEN_ADDR", defaults.listen_addr),
            store_backend: std::env::var("STORE_BACKEND")
                .ok()
                .and_then(|s| match s.parse::<StoreBackend>() {
                    Ok(backend) => Some(backend),
                    Err(err) => {
                        tracing::warn!(error = %err, "Invalid STORE_BACKEND, using json");
                        None
                    }
                })
                .unwrap_or_default(),
            data_dir: env_or("DATA_DIR", defaults.data_dir),
            cooldown_minutes: env_parse_or("COOLDOWN_MINUTES", defaults.cooldown_minutes),
            provider_timeout_seconds: env_parse_or(
                "PROVIDER_TIMEOUT_SECONDS",
                defaults.provider_timeout_seconds,
            ),
            location_cache_ttl_seconds: env_parse_or(
                "LOCATION_CACHE_TTL_SECONDS",
                defaults.location_cache_ttl_seconds,
            ),
            ipapi_base_url: env_or("IPAPI_BASE_URL", defaults.ipapi_base_url),
            ipapi_com_base_url: env_or("IPAPI_COM_BASE_URL", defaults.ipapi_com_base_url),
            nominatim_base_url: env_or("NOMINATIM_BASE_URL", defaults.nominatim_base_url),
            geoip_table_path: std::env::var("GEOIP_TABLE_PATH").ok(),
            cors_origins: env_or("CORS_ORIGINS", "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse_or("MAX_BODY_BYTES", defaults.max_body_bytes),
            request_timeout_seconds: env_parse_or(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
        }
    }

    /// The cooldown window as a duration.
    #[must_use]
    pub fn cooldown_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cooldown_minutes)
    }

    /// The per-provider timeout as a duration.
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    /// The location cache TTL as a duration.
    #[must_use]
    pub fn location_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.location_cache_ttl_seconds)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            store_backend: StoreBackend::Json,
            data_dir: "/data/billtrace".into(),
            cooldown_minutes: 30,
            provider_timeout_seconds: 4,
            location_cache_ttl_seconds: 3600,
            ipapi_base_url: "https://ipapi.co".into(),
            ipapi_com_base_url: "http://ip-api.com".into(),
            nominatim_base_url: "https://nominatim.openstreetmap.org".into(),
            geoip_table_path: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
