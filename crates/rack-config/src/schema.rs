//! Settings schema types.

use rack_telemetry::LogConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment settings for a Rack function.
///
/// # Example
///
/// ```
/// use rack_config::{EventSource, RackSettings};
///
/// let settings: RackSettings = toml::from_str(r#"
///     event_source = "alb"
///
///     [logging]
///     level = "debug"
/// "#).unwrap();
///
/// assert_eq!(settings.event_source, EventSource::Alb);
/// assert_eq!(settings.logging.level, "debug");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RackSettings {
    /// Service name used in logs.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Which event source the function sits behind.
    #[serde(default)]
    pub event_source: EventSource,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for RackSettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            event_source: EventSource::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl RackSettings {
    /// Settings for local development: pretty debug logs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingSettings {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                file_line_info: true,
                ..LoggingSettings::default()
            },
            ..Self::default()
        }
    }

    /// Settings for deployed functions: JSON info logs.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty service name or an
    /// unparsable log filter.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(crate::ConfigError::invalid_value(
                "service_name",
                "must not be empty",
            ));
        }

        if self.logging.enabled {
            rack_telemetry::logging::create_env_filter(&self.logging.level)
                .map_err(|e| crate::ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Returns the logging configuration for `rack_telemetry::init_logging`.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig::from(&self.logging);
        config.service_name.clone_from(&self.service_name);
        config
    }
}

fn default_service_name() -> String {
    "rack-function".to_string()
}

/// Which event source the function sits behind.
///
/// `Auto` detects the format per invocation. Naming a source skips detection
/// and decodes every payload with that format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Detect the format of each payload.
    #[default]
    Auto,
    /// API Gateway REST proxy integration.
    ApiGatewayProxy,
    /// API Gateway HTTP API.
    ApiGatewayV2,
    /// Application Load Balancer.
    Alb,
}

impl EventSource {
    const ALL: [Self; 4] = [Self::Auto, Self::ApiGatewayProxy, Self::ApiGatewayV2, Self::Alb];

    /// Returns the settings name of this source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::ApiGatewayProxy => "api_gateway_proxy",
            Self::ApiGatewayV2 => "api_gateway_v2",
            Self::Alb => "alb",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("expected 'auto', 'api_gateway_proxy', 'api_gateway_v2' or 'alb', got '{s}'")
            })
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info", "rack=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include the module path in logs.
    #[serde(default = "default_true")]
    pub include_target: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub file_line_info: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_target: true,
            file_line_info: false,
        }
    }
}

impl From<&LoggingSettings> for LogConfig {
    fn from(settings: &LoggingSettings) -> Self {
        let base = match settings.format {
            LogFormat::Json => Self::production(),
            LogFormat::Pretty => Self::development(),
        };
        Self {
            enabled: settings.enabled,
            level: settings.level.clone(),
            json_format: settings.format == LogFormat::Json,
            file_line_info: settings.file_line_info,
            include_target: settings.include_target,
            ..base
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
