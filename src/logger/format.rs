//! Log record format module
//!
//! Two line formats are produced from the same record:
//! - `json` for the file sinks, one object per line
//! - `simple` for the console, `level: message {"service":...}`

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single log event
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord<'a> {
    pub level: Level,
    pub message: &'a str,
    pub service: &'a str,
    pub timestamp: DateTime<Local>,
}

impl<'a> LogRecord<'a> {
    /// Create a record stamped with the current time
    pub fn new(level: Level, message: &'a str, service: &'a str) -> Self {
        Self {
            level,
            message,
            service,
            timestamp: Local::now(),
        }
    }

    /// JSON structured format
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"level":"error","message":"log record serialization failed: {e}"}}"#
            )
        })
    }

    /// Human-readable console format
    pub fn to_simple(&self) -> String {
        let meta = serde_json::json!({ "service": self.service });
        format!("{}: {} {meta}", self.level, self.message)
    }
}
