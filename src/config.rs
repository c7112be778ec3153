use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Elasticsearch connection configuration
    pub elasticsearch: ElasticsearchConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: LOG_INGESTOR_)
            .add_source(
                config::Environment::with_prefix("LOG_INGESTOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Socket address the HTTP server binds to
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            elasticsearch: ElasticsearchConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Cluster base URL
    #[serde(default = "default_es_url")]
    pub url: String,

    /// Basic auth username; auth is skipped when empty
    #[serde(default = "default_es_username")]
    pub username: String,

    /// Basic auth password
    #[serde(default)]
    pub password: String,

    /// Hex SHA-256 fingerprint of the cluster certificate
    #[serde(default)]
    pub certificate_fingerprint: Option<String>,

    /// Index that receives and serves log documents
    #[serde(default = "default_es_index")]
    pub index: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_es_timeout")]
    pub timeout_secs: u64,
}

impl ElasticsearchConfig {
    /// Configured fingerprint, ignoring blank values coming from env overrides
    pub fn fingerprint(&self) -> Option<&str> {
        self.certificate_fingerprint
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_es_url(),
            username: default_es_username(),
            password: String::new(),
            certificate_fingerprint: None,
            index: default_es_index(),
            timeout_secs: default_es_timeout(),
        }
    }
}

// Keeps the password out of startup logs.
impl std::fmt::Debug for ElasticsearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("certificate_fingerprint", &self.certificate_fingerprint)
            .field("index", &self.index)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            prometheus_enabled: default_true(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_es_url() -> String {
    "https://127.0.0.1:9200".to_string()
}

fn default_es_username() -> String {
    "elastic".to_string()
}

fn default_es_index() -> String {
    "logs".to_string()
}

fn default_es_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_http_port(), 3000);
        assert_eq!(default_es_index(), "logs");
        assert_eq!(default_log_level(), "info");
        assert!(default_true());
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.elasticsearch.url, "https://127.0.0.1:9200");
        assert_eq!(config.elasticsearch.index, "logs");
        assert!(config.elasticsearch.fingerprint().is_none());
        assert_eq!(config.http_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_blank_fingerprint_is_ignored() {
        let es = ElasticsearchConfig {
            certificate_fingerprint: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(es.fingerprint().is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let es = ElasticsearchConfig {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", es);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
