// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

use crate::logger::Level;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Service identity and deployment mode
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Stamped as `service` on every log record
    pub service_name: String,
    /// `production` disables the console log sink
    pub environment: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    /// Error-only sink
    pub error_log_file: String,
    /// All-levels sink
    pub combined_log_file: String,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}
