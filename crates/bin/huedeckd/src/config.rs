//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `huedeck.toml` in the working directory. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values.

use huedeck_adapter_hue_http::HueHttpConfig;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Bridge client settings.
    pub bridge: BridgeConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `127.0.0.1`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Hue bridge client configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `http` or `https`.
    pub scheme: String,
}

impl Config {
    /// Load configuration from `huedeck.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("huedeck.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HUEDECK_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("HUEDECK_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("HUEDECK_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("HUEDECK_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("HUEDECK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("HUEDECK_BRIDGE_TIMEOUT")
            && let Ok(secs) = val.parse()
        {
            self.bridge.timeout_secs = secs;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.bridge.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "bridge timeout must be non-zero".to_string(),
            ));
        }
        if !matches!(self.bridge.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "unsupported bridge scheme: {}",
                self.bridge.scheme
            )));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Settings for the bridge controller.
    #[must_use]
    pub fn hue_http(&self) -> HueHttpConfig {
        HueHttpConfig {
            timeout_secs: self.bridge.timeout_secs,
            scheme: self.bridge.scheme.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3100,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:huedeck.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "huedeckd=info,huedeck=info,host=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let defaults = HueHttpConfig::default();
        Self {
            timeout_secs: defaults.timeout_secs,
            scheme: defaults.scheme,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3100);
        assert_eq!(config.database.url, "sqlite:huedeck.db?mode=rwc");
        assert_eq!(config.bridge.timeout_secs, 5);
        assert_eq!(config.bridge.scheme, "http");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3100);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '0.0.0.0'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [bridge]
            timeout_secs = 2
            scheme = 'https'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.bridge.timeout_secs, 2);
        assert_eq!(config.hue_http().scheme, "https");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3100);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_bridge_timeout() {
        let mut config = Config::default();
        config.bridge.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_unknown_scheme() {
        let mut config = Config::default();
        config.bridge.scheme = "ftp".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: unsupported bridge scheme: ftp"
        );
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let mut config = Config::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [bridge]
            timeout_secs = 10
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bridge.timeout_secs, 10);
        assert_eq!(config.bridge.scheme, "http");
        assert_eq!(config.database_url(), "sqlite:huedeck.db?mode=rwc");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
