// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Plain environment variables that override file and prefixed settings
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    /// `PORT`
    pub port: Option<String>,
    /// `APP_ENV`
    pub environment: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT").ok().filter(|v| !v.is_empty()),
            environment: std::env::var("APP_ENV").ok().filter(|v| !v.is_empty()),
        }
    }
}

impl Config {
    /// Load configuration from the given file path (without extension),
    /// `CALC_*` variables, `PORT` and `APP_ENV`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with(Some(config_path), &EnvOverrides::from_env())
    }

    /// Load configuration with explicit overrides.
    ///
    /// With no file path only defaults, `CALC_*` variables and the overrides apply.
    pub fn load_with(
        config_path: Option<&str>,
        overrides: &EnvOverrides,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("CALC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3040)?
            .set_default("app.service_name", "calculate-service")?
            .set_default("app.environment", "development")?
            .set_default("logging.level", "info")?
            .set_default("logging.error_log_file", "error.log")?
            .set_default("logging.combined_log_file", "combined.log")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_override_option("server.port", overrides.port.clone())?
            .set_override_option("app.environment", overrides.environment.clone())?
            .build()?;

        settings.try_deserialize()
    }

    /// Listen address; `host` is an IPv4 or IPv6 literal such as `0.0.0.0` or `::`
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| format!("Invalid address {}: {e}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
