//! Logger module
//!
//! Provides the logging capability handed to request handlers:
//! - `Log` trait with info/warn/error entry points
//! - `Logger`, the file-backed implementation built once at startup
//! - Helpers for the fixed server lifecycle and request messages

mod format;
pub mod writer;

pub use format::{Level, LogRecord};

use crate::config::Config;
use hyper::Method;
use std::any::Any;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use writer::LogWriter;

/// Logging capability injected into handlers
pub trait Log: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// File-backed logger stamping every record with the service name
pub struct Logger {
    writer: LogWriter,
    level: Level,
    service: String,
}

impl Logger {
    /// Build the logger from configuration.
    ///
    /// The console sink is only attached outside production.
    pub fn from_config(config: &Config) -> std::io::Result<Self> {
        let writer = LogWriter::open(
            &config.logging.error_log_file,
            &config.logging.combined_log_file,
            !config.app.is_production(),
        )?;

        Ok(Self {
            writer,
            level: config.logging.level,
            service: config.app.service_name.clone(),
        })
    }
}

impl Log for Logger {
    fn log(&self, level: Level, message: &str) {
        if level < self.level {
            return;
        }
        self.writer
            .write(&LogRecord::new(level, message, &self.service));
    }
}

pub fn log_server_start(log: &dyn Log, addr: &SocketAddr, config: &Config) {
    log.info(&format!(
        "Microservice listening on port {} ({addr})",
        config.server.port
    ));
    log.info(&format!(
        "Environment: {}, log level: {}",
        config.app.environment, config.logging.level
    ));
    if let Some(workers) = config.server.workers {
        log.info(&format!("Worker threads: {workers}"));
    }
    log.info(&format!(
        "Error log: {}, combined log: {}",
        config.logging.error_log_file, config.logging.combined_log_file
    ));
}

pub fn log_incoming_request(log: &dyn Log, method: &Method, url: &str, ip: IpAddr) {
    log.info(&format!(
        "Incoming request - Method: {method}, URL: {url}, IP: {ip}"
    ));
}

pub fn log_connection_error(log: &dyn Log, err: &impl std::fmt::Debug) {
    log.error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_shutdown(log: &dyn Log, active: usize) {
    log.info(&format!(
        "Shutdown requested, {active} connection(s) still finishing"
    ));
}

/// Route panic reports through `log` instead of the default stderr hook
pub fn install_panic_hook(log: Arc<dyn Log>) {
    std::panic::set_hook(Box::new(move |info| {
        let message = panic_message(info.payload());
        match info.location() {
            Some(location) => log.error(&format!("Panic at {location}: {message}")),
            None => log.error(&format!("Panic: {message}")),
        }
    }));
}

/// Text carried by a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic while handling request".to_string()
    }
}

pub fn log_drain_timeout(log: &dyn Log, remaining: usize) {
    log.warn(&format!(
        "{remaining} connection(s) still open after drain timeout, closing"
    ));
}

/// In-memory logger for asserting on emitted records
#[cfg(test)]
pub mod capture {
    use super::{Level, Log};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct CaptureLog {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl CaptureLog {
        pub fn records(&self) -> Vec<(Level, String)> {
            self.records.lock().unwrap().clone()
        }

        pub fn count(&self, level: Level, needle: &str) -> usize {
            self.records()
                .iter()
                .filter(|(l, m)| *l == level && m.contains(needle))
                .count()
        }
    }

    impl Log for CaptureLog {
        fn log(&self, level: Level, message: &str) {
            self.records
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::capture::CaptureLog;
    use super::*;

    #[test]
    fn test_panic_hook_reports_through_log() {
        let log = Arc::new(CaptureLog::default());
        install_panic_hook(log.clone());
        let caught = std::panic::catch_unwind(|| panic!("hooked panic {}", 7));
        drop(std::panic::take_hook());

        assert!(caught.is_err());
        assert_eq!(log.count(Level::Error, "hooked panic 7"), 1);
        assert_eq!(log.count(Level::Error, "Panic at src/logger/mod.rs"), 1);
    }

    #[test]
    fn test_incoming_request_line() {
        let log = CaptureLog::default();
        log_incoming_request(
            &log,
            &Method::GET,
            "/add?n1=2&n2=3",
            "127.0.0.1".parse().unwrap(),
        );
        assert_eq!(
            log.records(),
            vec![(
                Level::Info,
                "Incoming request - Method: GET, URL: /add?n1=2&n2=3, IP: 127.0.0.1".to_string()
            )]
        );
    }

    #[test]
    fn test_logger_filters_below_level() {
        let dir = std::env::temp_dir().join(format!(
            "calculate-service-logger-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);

        let mut config = Config::load_with(None, &crate::config::EnvOverrides::default()).unwrap();
        config.logging.level = Level::Error;
        config.app.environment = "production".to_string();
        config.logging.error_log_file = dir.join("error.log").display().to_string();
        config.logging.combined_log_file = dir.join("combined.log").display().to_string();

        let logger = Logger::from_config(&config).unwrap();
        logger.info("dropped");
        logger.error("kept");

        let combined = std::fs::read_to_string(dir.join("combined.log")).unwrap();
        assert!(!combined.contains("dropped"));
        assert!(combined.contains("kept"));
        assert!(combined.contains(r#""service":"calculate-service""#));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
