//! Settings loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading settings from
//! defaults, files and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ConfigError, LogFormat, RackSettings};

/// Settings loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Default values (built into the code)
/// 2. Settings file or string (TOML or JSON)
/// 3. Environment variables
///
/// A file or string is merged over the settings loaded so far: keys it sets
/// win, keys it omits keep their earlier value. Presets replace everything,
/// so apply them first.
///
/// # Example
///
/// ```no_run
/// use rack_config::ConfigLoader;
///
/// # fn main() -> Result<(), rack_config::ConfigError> {
/// let settings = ConfigLoader::new()
///     .with_optional_file("rack.toml")?
///     .with_env_prefix("RACK")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    settings: RackSettings,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new loader starting from default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with development preset settings.
    ///
    /// # Example
    ///
    /// ```
    /// use rack_config::{ConfigLoader, LogFormat};
    ///
    /// let settings = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(settings.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.settings = RackSettings::development();
        self
    }

    /// Start with production preset settings.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.settings = RackSettings::production();
        self
    }

    /// Load settings from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed or
    /// contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        self.merge(&content, extension)?;

        Ok(self)
    }

    /// Load settings from a file if it exists.
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

    /// Load settings from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or `format` is not `toml` or
    /// `json`.
    ///
    /// # Example
    ///
    /// ```
    /// use rack_config::{ConfigLoader, EventSource};
    ///
    /// let settings = ConfigLoader::new()
    ///     .with_string(r#"event_source = "api_gateway_v2""#, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(settings.event_source, EventSource::ApiGatewayV2);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.merge(content, format)?;
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`.
    /// For example, with prefix "RACK":
    /// - `RACK__EVENT_SOURCE=alb`
    /// - `RACK__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if one exists.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Apply overrides from explicit `(name, value)` pairs, as if they were
    /// environment variables carrying `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvParseError` for unknown keys or bad values.
    pub fn with_overrides<I, K, V>(mut self, prefix: &str, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let prefix = prefix.to_uppercase();
        for (key, value) in vars {
            self.apply_env_var(key.as_ref(), value.as_ref(), &prefix)?;
        }
        Ok(self)
    }

    /// Finalize and return the loaded settings.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override fails to parse or validation fails.
    pub fn load(mut self) -> Result<RackSettings, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let marker = format!("{prefix}__");
            let vars: Vec<(String, String)> = env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .filter(|(k, _)| k.starts_with(&marker))
                .collect();
            self = self.with_overrides(&prefix, vars)?;
        }

        self.settings.validate()?;
        Ok(self.settings)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> RackSettings {
        self.settings
    }

    fn merge(&mut self, content: &str, format: &str) -> Result<(), ConfigError> {
        // Typed parse first so unknown keys and bad values report the source format.
        parse::<RackSettings>(content, format)?;

        let mut merged = serde_json::to_value(&self.settings)?;
        overlay(&mut merged, parse(content, format)?);
        self.settings = serde_json::from_value(merged)?;
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            ["SERVICE_NAME"] => {
                self.settings.service_name = value.to_string();
            }
            ["EVENT_SOURCE"] => {
                self.settings.event_source = value
                    .parse()
                    .map_err(|reason: String| ConfigError::env_parse_error(key, reason))?;
            }

            // Logging section
            ["LOGGING", "ENABLED"] => {
                self.settings.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.settings.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.settings.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_TARGET"] => {
                self.settings.logging.include_target = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "FILE_LINE_INFO"] => {
                self.settings.logging.file_line_info = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            _ => {
                return Err(ConfigError::env_parse_error(key, "unknown setting"));
            }
        }

        Ok(())
    }
}

fn parse<T: DeserializeOwned>(content: &str, format: &str) -> Result<T, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                overlay(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, layer) => *base = layer,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
