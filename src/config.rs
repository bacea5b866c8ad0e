//! Configuration for the sync worker

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default engine host
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default engine port
fn default_port() -> u16 {
    9200
}

/// Default request timeout in seconds
fn default_timeout() -> u64 {
    30
}

/// Default target index
fn default_index() -> String {
    "projects".to_string()
}

/// Main configuration for the sync worker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search engine connection configuration
    #[serde(default)]
    pub engine: EngineConfig,
    /// Index mutation settings
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Search engine connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Full base URL override (e.g. "http://127.0.0.1:9200"). When set,
    /// host and port are ignored.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Engine hostname or address
    #[serde(default = "default_host")]
    pub host: String,
    /// Engine port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Basic auth username
    #[serde(default)]
    pub username: String,
    /// Basic auth password
    #[serde(default)]
    pub password: String,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure_tls: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            host: default_host(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            insecure_tls: false,
            timeout_secs: default_timeout(),
        }
    }
}

impl EngineConfig {
    /// Base URL for document requests. The endpoint override wins; otherwise
    /// the engine is addressed over TLS at host:port.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}:{}", self.host, self.port),
        }
    }
}

/// Index mutation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Target index name
    #[serde(default = "default_index")]
    pub index: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            index: default_index(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from the process environment.
    ///
    /// `ELASTICSEARCH_USERNAME` and `ELASTICSEARCH_PASSWORD` are required
    /// and their absence fails here, before any client is built or network
    /// touched. `ELASTICSEARCH_HOST`, `ELASTICSEARCH_PORT`,
    /// `ELASTICSEARCH_INSECURE_TLS` and `ELASTICSEARCH_INDEX` override the
    /// defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// The environment lookup is injected so tests never mutate process
    /// state.
    fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let username = lookup("ELASTICSEARCH_USERNAME")
            .ok_or_else(|| anyhow::anyhow!("ELASTICSEARCH_USERNAME is not set"))?;
        let password = lookup("ELASTICSEARCH_PASSWORD")
            .ok_or_else(|| anyhow::anyhow!("ELASTICSEARCH_PASSWORD is not set"))?;

        let mut config = Config::default();
        config.engine.username = username;
        config.engine.password = password;

        if let Some(host) = lookup("ELASTICSEARCH_HOST") {
            config.engine.host = host;
        }
        if let Some(port) = lookup("ELASTICSEARCH_PORT") {
            config.engine.port = port.parse().map_err(|_| {
                anyhow::anyhow!("ELASTICSEARCH_PORT must be a port number, got '{}'", port)
            })?;
        }
        if let Some(insecure) = lookup("ELASTICSEARCH_INSECURE_TLS") {
            config.engine.insecure_tls = matches!(insecure.as_str(), "1" | "true" | "yes");
        }
        if let Some(index) = lookup("ELASTICSEARCH_INDEX") {
            config.sync.index = index;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass rather than playing whack-a-mole.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if let Some(endpoint) = &self.engine.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                errors.push(format!(
                    "engine endpoint must start with http:// or https://, got '{}'",
                    endpoint
                ));
            }
        } else {
            if self.engine.host.is_empty() {
                errors.push("engine host must not be empty".to_string());
            }
            if self.engine.port == 0 {
                errors.push("engine port must be positive".to_string());
            }
        }

        if self.engine.username.is_empty() {
            errors.push("engine username must not be empty".to_string());
        }
        if self.engine.password.is_empty() {
            errors.push("engine password must not be empty".to_string());
        }
        if self.engine.timeout_secs == 0 {
            errors.push("timeout_secs must be positive".to_string());
        }

        if self.sync.index.is_empty() {
            errors.push("index must not be empty".to_string());
        }
        if self.sync.index.contains('/') {
            errors.push("index must not contain '/'".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Helper: build a valid config for mutation-based testing
    // ========================================================================

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.engine.username = "elastic".to_string();
        config.engine.password = "changeme".to_string();
        config
    }

    /// Environment double backed by a fixed set of pairs
    fn env_of<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    // ========================================================================
    // Config::validate
    // ========================================================================

    #[test]
    fn config_with_credentials_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn default_config_requires_credentials() {
        let err = Config::default().validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("username must not be empty"));
        assert!(msg.contains("password must not be empty"));
    }

    #[test]
    fn validate_rejects_empty_host() {
        let mut cfg = valid_config();
        cfg.engine.host = String::new();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("engine host must not be empty"));
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut cfg = valid_config();
        cfg.engine.port = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("engine port must be positive"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut cfg = valid_config();
        cfg.engine.timeout_secs = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs must be positive"));
    }

    #[test]
    fn validate_rejects_bad_index_names() {
        let mut cfg = valid_config();
        cfg.sync.index = String::new();
        assert!(cfg.validate().unwrap_err().to_string().contains("index must not be empty"));

        cfg.sync.index = "projects/_doc".to_string();
        assert!(cfg.validate().unwrap_err().to_string().contains("index must not contain '/'"));
    }

    #[test]
    fn validate_rejects_schemeless_endpoint() {
        let mut cfg = valid_config();
        cfg.engine.endpoint = Some("localhost:9200".to_string());
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("must start with http:// or https://"));
    }

    #[test]
    fn validate_skips_host_port_checks_when_endpoint_set() {
        let mut cfg = valid_config();
        cfg.engine.endpoint = Some("http://localhost:9200".to_string());
        cfg.engine.host = String::new();
        cfg.engine.port = 0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_collects_multiple_errors() {
        let mut cfg = Config::default();
        cfg.engine.timeout_secs = 0;
        cfg.sync.index = String::new();
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("username must not be empty"));
        assert!(msg.contains("timeout_secs must be positive"));
        assert!(msg.contains("index must not be empty"));
    }

    // ========================================================================
    // EngineConfig::base_url
    // ========================================================================

    #[test]
    fn base_url_defaults_to_tls_host_port() {
        let cfg = valid_config();
        assert_eq!(cfg.engine.base_url(), "https://127.0.0.1:9200");
    }

    #[test]
    fn base_url_prefers_endpoint_and_trims_trailing_slash() {
        let mut cfg = valid_config();
        cfg.engine.endpoint = Some("http://localhost:9200/".to_string());
        assert_eq!(cfg.engine.base_url(), "http://localhost:9200");
    }

    // ========================================================================
    // Config::from_env
    // ========================================================================

    #[test]
    fn from_env_requires_username() {
        let err = Config::from_env_with(env_of(&[("ELASTICSEARCH_PASSWORD", "pw")])).unwrap_err();
        assert!(err.to_string().contains("ELASTICSEARCH_USERNAME is not set"));
    }

    #[test]
    fn from_env_requires_password() {
        let err = Config::from_env_with(env_of(&[("ELASTICSEARCH_USERNAME", "user")])).unwrap_err();
        assert!(err.to_string().contains("ELASTICSEARCH_PASSWORD is not set"));
    }

    #[test]
    fn from_env_with_credentials_uses_defaults() {
        let cfg = Config::from_env_with(env_of(&[
            ("ELASTICSEARCH_USERNAME", "user"),
            ("ELASTICSEARCH_PASSWORD", "pw"),
        ]))
        .unwrap();
        assert_eq!(cfg.engine.host, "127.0.0.1");
        assert_eq!(cfg.engine.port, 9200);
        assert!(!cfg.engine.insecure_tls);
        assert_eq!(cfg.sync.index, "projects");
    }

    #[test]
    fn from_env_applies_overrides() {
        let cfg = Config::from_env_with(env_of(&[
            ("ELASTICSEARCH_USERNAME", "user"),
            ("ELASTICSEARCH_PASSWORD", "pw"),
            ("ELASTICSEARCH_HOST", "search.internal"),
            ("ELASTICSEARCH_PORT", "9243"),
            ("ELASTICSEARCH_INSECURE_TLS", "true"),
            ("ELASTICSEARCH_INDEX", "docs"),
        ]))
        .unwrap();
        assert_eq!(cfg.engine.host, "search.internal");
        assert_eq!(cfg.engine.port, 9243);
        assert!(cfg.engine.insecure_tls);
        assert_eq!(cfg.sync.index, "docs");
        assert_eq!(cfg.engine.base_url(), "https://search.internal:9243");
    }

    #[test]
    fn from_env_rejects_non_numeric_port() {
        let err = Config::from_env_with(env_of(&[
            ("ELASTICSEARCH_USERNAME", "user"),
            ("ELASTICSEARCH_PASSWORD", "pw"),
            ("ELASTICSEARCH_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("must be a port number"));
    }

    // ========================================================================
    // Config::load
    // ========================================================================

    #[test]
    fn load_reads_and_validates_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essync.toml");
        std::fs::write(
            &path,
            r#"
[engine]
host = "search.internal"
port = 9243
username = "elastic"
password = "changeme"
insecure_tls = true

[sync]
index = "docs"
"#,
        )
        .unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.engine.host, "search.internal");
        assert_eq!(cfg.engine.port, 9243);
        assert!(cfg.engine.insecure_tls);
        assert_eq!(cfg.engine.timeout_secs, 30);
        assert_eq!(cfg.sync.index, "docs");
    }

    #[test]
    fn load_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essync.toml");
        std::fs::write(&path, "[engine]\nusername = \"elastic\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("password must not be empty"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/essync.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
