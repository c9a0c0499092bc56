//! Server configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use petition_utils::LogFormat;
use petition_verification::{AppId, CloudVerifier, DEFAULT_VERIFY_BASE_URL};

use crate::ConfigError;

/// Where petitions are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart.
    #[default]
    Memory,
    /// LMDB environment under `data_dir`.
    Lmdb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "lmdb" => Ok(Self::Lmdb),
            other => Err(ConfigError::Parse(format!(
                "unknown storage backend '{other}' (expected \"memory\" or \"lmdb\")"
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Lmdb => f.write_str("lmdb"),
        }
    }
}

/// Configuration for the petitions server.
///
/// Can be loaded from a TOML file via [`ServerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Storage backend.
    #[serde(default)]
    pub storage: StorageBackend,

    /// Data directory for the LMDB backend.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Identity provider application id. `/api/verify` answers 503 without it.
    #[serde(default)]
    pub app_id: Option<AppId>,

    /// Identity provider action id.
    #[serde(default)]
    pub action: Option<String>,

    /// Base URL of the cloud verification API.
    #[serde(default = "default_verify_base_url")]
    pub verify_base_url: String,

    /// Timeout for one cloud verification request, in seconds.
    #[serde(default = "default_verify_timeout_secs")]
    pub verify_timeout_secs: u64,

    /// Whether to expose Prometheus metrics at `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./petition_data")
}

fn default_lmdb_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_verify_base_url() -> String {
    DEFAULT_VERIFY_BASE_URL.to_string()
}

fn default_verify_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// `host:port` to listen on.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }

    /// Build the cloud verifier, or `None` when `app_id` or `action` is
    /// unset.
    pub fn cloud_verifier(&self) -> Result<Option<CloudVerifier>, ConfigError> {
        let (Some(app_id), Some(action)) = (&self.app_id, &self.action) else {
            return Ok(None);
        };
        CloudVerifier::with_timeout(
            self.verify_base_url.clone(),
            app_id.clone(),
            action.clone(),
            self.verify_timeout(),
        )
        .map(Some)
        .map_err(|e| ConfigError::Verification(e.to_string()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            storage: StorageBackend::default(),
            data_dir: default_data_dir(),
            lmdb_map_size: default_lmdb_map_size(),
            app_id: None,
            action: None,
            verify_base_url: default_verify_base_url(),
            verify_timeout_secs: default_verify_timeout_secs(),
            enable_metrics: false,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ServerConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = ServerConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.port, config.port);
        assert_eq!(parsed.storage, config.storage);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ServerConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.verify_base_url, DEFAULT_VERIFY_BASE_URL);
        assert!(config.app_id.is_none());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            port = 8080
            storage = "lmdb"
            app_id = "app_staging_abc"
            action = "create-petition"
            log_format = "json"
        "#;
        let config = ServerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageBackend::Lmdb);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert!(config.cloud_verifier().unwrap().is_some());
    }

    #[test]
    fn bad_app_id_is_rejected_at_parse_time() {
        let result = ServerConfig::from_toml_str(r#"app_id = "staging_abc""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn verifier_needs_both_app_id_and_action() {
        let config = ServerConfig {
            app_id: Some(AppId::new("app_x1").unwrap()),
            ..Default::default()
        };
        assert!(config.cloud_verifier().unwrap().is_none());
    }

    #[test]
    fn missing_file_returns_read_error() {
        let result = ServerConfig::from_toml_file("/nonexistent/petitions.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn storage_backend_parses_from_cli_strings() {
        assert_eq!("LMDB".parse::<StorageBackend>().unwrap(), StorageBackend::Lmdb);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
