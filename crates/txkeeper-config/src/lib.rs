//! Configuration management for txkeeper
//!
//! This module handles loading and validation of the txkeeper
//! configuration from YAML files.

pub mod error;

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// The single credential pair accepted by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthenticationConfig {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

/// Token signing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared HMAC secret
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Token lifetime in seconds. Kept as the raw configured text; it is
    /// only interpreted when a token is issued.
    #[serde(
        default = "default_token_expiration",
        deserialize_with = "scalar_as_string"
    )]
    pub token_expiration_seconds: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            issuer: default_issuer(),
            audience: default_audience(),
            token_expiration_seconds: default_token_expiration(),
        }
    }
}

fn default_issuer() -> String {
    "txkeeper".to_string()
}

fn default_audience() -> String {
    "txkeeper".to_string()
}

fn default_token_expiration() -> String {
    "3600".to_string()
}

/// Accept `600`, `600.5` or `"600"` and keep the textual form.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Text(s) => s,
    })
}

/// Data file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON document holding every transaction record
    #[serde(default = "default_json_data_file_path")]
    pub json_data_file_path: PathBuf,
    /// Fail on an unreadable or corrupt document instead of treating it as empty
    #[serde(default)]
    pub strict_load: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            json_data_file_path: default_json_data_file_path(),
            strict_load: false,
        }
    }
}

fn default_json_data_file_path() -> PathBuf {
    PathBuf::from("./data/transactions.json")
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Login credential
    #[serde(default)]
    pub authentication: AuthenticationConfig,
    /// Token settings
    #[serde(default)]
    pub jwt: JwtConfig,
    /// Data file settings
    #[serde(default)]
    pub data: DataConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let required = [
            ("authentication.user_name", self.authentication.user_name.as_str()),
            ("authentication.password", self.authentication.password.as_str()),
            ("jwt.secret_key", self.jwt.secret_key.as_str()),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        if self.data.json_data_file_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.json_data_file_path".to_string(),
                reason: "Data file path must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
authentication:
  user_name: lenvi
  password: P4ssw0rd
jwt:
  secret_key: "Th1s 1s a very long secret key @ 2023"
"#;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.jwt.issuer, "txkeeper");
        assert_eq!(config.jwt.token_expiration_seconds, "3600");
        assert_eq!(
            config.data.json_data_file_path,
            PathBuf::from("./data/transactions.json")
        );
        assert!(!config.data.strict_load);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_expiration_accepts_number_or_text() {
        let yaml = format!("{}  token_expiration_seconds: 600\n", MINIMAL);
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.jwt.token_expiration_seconds, "600");

        let yaml = format!("{}  token_expiration_seconds: \"-5\"\n", MINIMAL);
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.jwt.token_expiration_seconds, "-5");
    }

    #[test]
    fn test_missing_credential_rejected() {
        let yaml = "jwt:\n  secret_key: abc\n";
        match Config::from_yaml(yaml) {
            Err(ConfigError::MissingField { field }) => {
                assert_eq!(field, "authentication.user_name")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_zero_port_rejected() {
        let yaml = format!("{}server:\n  port: 0\n", MINIMAL);
        assert!(matches!(
            Config::from_yaml(&yaml),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            Config::from_yaml("server: [unclosed"),
            Err(ConfigError::InvalidYaml { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.authentication.user_name, "lenvi");

        let missing = Config::load("/definitely/not/here.yaml");
        assert!(matches!(missing, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.jwt.token_expiration_seconds, "600");
    }
}
