//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, `.env`, and environment variables.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use demo_telemetry::LogFormat;

use crate::{AppConfig, ConfigError, Environment};

/// Prefix for `PREFIX__SECTION__KEY` overrides used by [`ConfigLoader::from_env`].
pub const ENV_PREFIX: &str = "DEMO";

/// Environment variable naming an optional configuration file.
pub const CONFIG_FILE_ENV: &str = "DEMO_CONFIG_FILE";

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Conventional environment variables (`PORT`, `HOST`, `APP_ENV`)
/// 4. Prefixed overrides (`DEMO__SERVER__PORT`, ...)
///
/// A `.env` file loaded with [`with_dotenv`](Self::with_dotenv) feeds the
/// process environment and therefore layers 3 and 4.
///
/// # Example
///
/// ```no_run
/// use demo_config::ConfigLoader;
///
/// # fn main() -> Result<(), demo_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("demo.toml")?
///     .with_standard_env()
///     .with_env_prefix("DEMO")
///     .load()?;
///
/// println!("listening on {}", config.socket_addr()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: AppConfig,
    env_prefix: Option<String>,
    standard_env: bool,
    env_source: Option<Vec<(String, String)>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            env_prefix: None,
            standard_env: false,
            env_source: None,
        }
    }

    /// Loader wired the way the service binary uses it.
    ///
    /// Loads `.env`, then the file named by `DEMO_CONFIG_FILE` if set, then
    /// `PORT`/`HOST`/`APP_ENV`, then `DEMO__*` overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `.env` or the named file cannot be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        let loader = Self::new().with_dotenv()?;
        let loader = match env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => loader.with_file(path.trim())?,
            _ => loader,
        };
        Ok(loader.with_standard_env().with_env_prefix(ENV_PREFIX))
    }

    /// Start with default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = AppConfig::default();
        self
    }

    /// Start with the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = AppConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = AppConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`. Sections
    /// missing from the file take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed,
    /// or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unsupported.
    ///
    /// # Example
    ///
    /// ```
    /// use demo_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[server]\nport = 8080", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.port, 8080);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Load a `.env` file from the working directory or its parents.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvError` if the file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `PORT`, `HOST` and `APP_ENV` when set.
    #[must_use]
    pub fn with_standard_env(mut self) -> Self {
        self.standard_env = true;
        self
    }

    /// Set the prefix for `PREFIX__SECTION__KEY` overrides.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Read environment variables from `vars` instead of the process environment.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_source = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Apply environment layers, validate, and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment value fails to parse, a
    /// prefixed key is unknown, or validation fails.
    pub fn load(mut self) -> Result<AppConfig, ConfigError> {
        let vars = self.env_vars();

        if self.standard_env {
            self.apply_standard_env(&vars)?;
        }

        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&vars, &prefix)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Return the configuration without environment layers or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> AppConfig {
        self.config
    }

    fn env_vars(&self) -> Vec<(String, String)> {
        let mut vars = self.env_source.clone().unwrap_or_else(|| {
            env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect()
        });
        vars.sort();
        vars
    }

    fn parse_file(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_standard_env(&mut self, vars: &[(String, String)]) -> Result<(), ConfigError> {
        for (key, value) in vars {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.as_str() {
                "PORT" => self.config.server.port = parse_value(key, value, "expected port number")?,
                "HOST" => self.config.server.host = value.to_string(),
                "APP_ENV" => {
                    self.config.environment = Environment::from_str(value)
                        .map_err(|reason| ConfigError::env_parse_error(key, reason))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn apply_env_overrides(
        &mut self,
        vars: &[(String, String)],
        prefix: &str,
    ) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(path) = key.strip_prefix(&marker) {
                self.apply_env_var(key, path, value)?;
            }
        }
        Ok(())
    }

    // `path` is the key with `PREFIX__` removed, e.g. `SERVER__PORT`.
    fn apply_env_var(&mut self, key: &str, path: &str, value: &str) -> Result<(), ConfigError> {
        let parts: Vec<&str> = path.split("__").collect();

        match parts.as_slice() {
            ["SERVER", "HOST"] => self.config.server.host = value.to_string(),
            ["SERVER", "PORT"] => {
                self.config.server.port = parse_value(key, value, "expected port number")?;
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                self.config.server.shutdown_timeout_secs =
                    parse_value(key, value, "expected integer")?;
            }
            ["SERVER", "REQUEST_TIMEOUT_SECS"] => {
                self.config.server.request_timeout_secs =
                    parse_value(key, value, "expected integer")?;
            }

            ["SERVICE", "NAME"] => self.config.service.name = value.to_string(),
            ["SERVICE", "VERSION"] => self.config.service.version = value.to_string(),

            ["ENVIRONMENT"] => {
                self.config.environment = Environment::from_str(value)
                    .map_err(|reason| ConfigError::env_parse_error(key, reason))?;
            }

            ["LOGGING", "LEVEL"] => self.config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = LogFormat::from_str(value).map_err(|_| {
                    ConfigError::env_parse_error(key, "expected 'json', 'pretty' or 'compact'")
                })?;
            }

            ["METRICS", "ENABLED"] => {
                self.config.metrics.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["METRICS", "ADDR"] => self.config.metrics.addr = value.to_string(),

            [section, rest @ ..] => {
                let field = if rest.is_empty() {
                    section.to_lowercase()
                } else {
                    rest.join(".").to_lowercase()
                };
                return Err(ConfigError::unknown_field(field, section.to_lowercase()));
            }
            [] => return Err(ConfigError::env_parse_error(key, "invalid key format")),
        }

        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, expected))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
