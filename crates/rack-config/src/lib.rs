//! # Rack Config
//!
//! Deployment settings for Rack functions.
//!
//! Settings are layered: built-in defaults, then an optional TOML or JSON
//! file, then `RACK__*` environment variables. Unknown fields are rejected so
//! typos fail at cold start instead of being silently ignored.
//!
//! ## Example
//!
//! ```toml
//! service_name = "orders"
//! event_source = "api_gateway_v2"   # or "auto", "api_gateway_proxy", "alb"
//!
//! [logging]
//! level = "info,rack=debug"
//! format = "json"
//! ```
//!
//! ```no_run
//! use rack_config::ConfigLoader;
//!
//! # fn main() -> Result<(), rack_config::ConfigError> {
//! let settings = ConfigLoader::new()
//!     .with_dotenv()
//!     .with_optional_file("rack.toml")?
//!     .with_env_prefix("RACK")
//!     .load()?;
//!
//! rack_telemetry::init_logging(&settings.log_config()).ok();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{EventSource, LogFormat, LoggingSettings, RackSettings};
