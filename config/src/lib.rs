//! # Configuration Management for TypeCodes
//!
//! Settings for the optional database connection and for text parameter
//! parsing.
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "myapp"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [marshalling]
//! grouping_separator = ","
//! trim_parameters = false
//! ```
//!
//! Load configuration:
//! ```no_run
//! use config::AppConfig;
//!
//! // Load from the file named by TYPECODES_CONFIG, or ./typecodes.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./typecodes.toml";
const CONFIG_PATH_VAR: &str = "TYPECODES_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Absent when only in-process marshalling is used
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub marshalling: MarshallingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// How text parameters are parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarshallingConfig {
    /// Digit grouping character ignored when parsing decimals
    #[serde(default = "default_grouping_separator")]
    pub grouping_separator: char,
    /// Trim surrounding whitespace before parsing
    #[serde(default)]
    pub trim_parameters: bool,
}

fn default_grouping_separator() -> char {
    ','
}

impl Default for MarshallingConfig {
    fn default() -> Self {
        Self {
            grouping_separator: default_grouping_separator(),
            trim_parameters: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file specified in .env or defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; a malformed one is not
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err.into());
            }
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.marshalling.validate()
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl MarshallingConfig {
    pub fn new(grouping_separator: char, trim_parameters: bool) -> Self {
        Self {
            grouping_separator,
            trim_parameters,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let separator = self.grouping_separator;
        if separator.is_ascii_digit() || matches!(separator, '.' | '-' | '+') {
            return Err(ConfigError::Invalid(format!(
                "Grouping separator '{}' would change the meaning of numbers",
                separator
            )));
        }
        Ok(())
    }
}
