//! Configuration management for the weather gateway
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates the result once at start-up.

use crate::GatewayError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "weather-gateway.toml";

const ENV_PREFIX: &str = "WEATHER_GATEWAY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listener and CORS settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream provider settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Cross-origin policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. A single `"*"` allows any origin without credentials.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

/// Upstream weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL, `/weather` and `/forecast` are appended
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds, unset keeps the HTTP client default
    pub timeout_seconds: Option<u32>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl CorsConfig {
    /// Whether the wildcard origin mode is selected, i.e. the list is exactly `["*"]`
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.allowed_origins.as_slice(), [origin] if origin == "*")
    }
}

impl GatewayConfig {
    /// Load configuration from the specified path, or from
    /// [`DEFAULT_CONFIG_FILE`] when none is given
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(GatewayError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    ))
                    .into());
                }
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                builder = builder.add_source(
                    File::with_name(DEFAULT_CONFIG_FILE)
                        .required(false)
                        .format(FileFormat::Toml),
                );
            }
        }

        // WEATHER_GATEWAY_SERVER__PORT=9000 style overrides
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors.allowed_origins")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GatewayConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.resolve_api_key(std::env::var(API_KEY_ENV).ok());

        config.validate()?;

        Ok(config)
    }

    /// Fill the API key from the conventional environment variable if the
    /// layered sources left it unset. Blank keys count as unset.
    pub fn resolve_api_key(&mut self, from_env: Option<String>) {
        let normalize = |key: Option<String>| key.filter(|k| !k.trim().is_empty());

        self.weather.api_key = normalize(self.weather.api_key.take()).or(normalize(from_env));
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_server()?;
        self.validate_weather()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(GatewayError::config("Server port cannot be 0").into());
        }

        if self.server.cors.allowed_origins.is_empty() {
            return Err(GatewayError::config(
                "At least one CORS origin must be configured (use \"*\" for any origin)",
            )
            .into());
        }

        let origins = &self.server.cors;
        if !origins.is_wildcard() && origins.allowed_origins.iter().any(|o| o == "*") {
            return Err(GatewayError::config(
                "CORS origin \"*\" cannot be combined with other origins",
            )
            .into());
        }

        Ok(())
    }

    fn validate_weather(&self) -> Result<()> {
        let base_url = &self.weather.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GatewayError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if let Some(timeout) = self.weather.timeout_seconds {
            if timeout == 0 || timeout > 300 {
                return Err(GatewayError::config(
                    "Weather API timeout must be between 1 and 300 seconds",
                )
                .into());
            }
        }

        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GatewayError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GatewayError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(
            config.weather.base_url,
            "https://api.openweathermap.org/data/2.5"
        );
        assert!(config.weather.api_key.is_none());
        assert!(config.weather.timeout_seconds.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_is_not_fatal() {
        // requests fail individually instead
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_api_key_from_env() {
        let mut config = GatewayConfig::default();
        config.resolve_api_key(Some("env_key".to_string()));
        assert_eq!(config.weather.api_key.as_deref(), Some("env_key"));
    }

    #[test]
    fn test_resolve_api_key_prefers_layered_value() {
        let mut config = GatewayConfig::default();
        config.weather.api_key = Some("file_key".to_string());
        config.resolve_api_key(Some("env_key".to_string()));
        assert_eq!(config.weather.api_key.as_deref(), Some("file_key"));
    }

    #[test]
    fn test_resolve_api_key_blank_is_unset() {
        let mut config = GatewayConfig::default();
        config.weather.api_key = Some("   ".to_string());
        config.resolve_api_key(Some(String::new()));
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = GatewayConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = GatewayConfig::default();
        config.weather.timeout_seconds = Some(500);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout must be"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = GatewayConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_origins() {
        let mut config = GatewayConfig::default();
        config.server.cors.allowed_origins.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_wildcard() {
        let mut cors = CorsConfig::default();
        assert!(!cors.is_wildcard());
        cors.allowed_origins = vec!["*".to_string()];
        assert!(cors.is_wildcard());
    }

    #[rstest]
    #[case(vec!["*", "http://localhost:3000"])]
    #[case(vec!["http://localhost:3000", "*"])]
    #[case(vec!["*", "not a url"])]
    #[case(vec!["*", "*"])]
    fn test_wildcard_mixed_with_other_origins(#[case] origins: Vec<&str>) {
        let mut config = GatewayConfig::default();
        config.server.cors.allowed_origins = origins.into_iter().map(str::to_string).collect();

        assert!(!config.server.cors.is_wildcard());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "weather-gateway-test-{}.toml",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"
[server]
port = 9100

[server.cors]
allowed_origins = ["*"]

[weather]
api_key = "from_file"
timeout_seconds = 5

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = GatewayConfig::load_from_path(Some(path.clone()));
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.cors.is_wildcard());
        assert_eq!(config.weather.api_key.as_deref(), Some("from_file"));
        assert_eq!(config.weather.timeout_seconds, Some(5));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = GatewayConfig::load_from_path(Some(PathBuf::from(
            "/nonexistent/weather-gateway.toml",
        )));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Config file not found"));
    }
}
