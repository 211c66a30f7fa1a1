//! Log writer module
//!
//! Fans each record out to a set of sinks. File sinks are append-only;
//! the console sink splits errors to stderr and everything else to stdout.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use super::format::{Level, LogRecord};

/// Log output target
enum LogTarget {
    /// stdout, or stderr for errors
    Console,
    /// Append to file
    File(Mutex<File>),
}

/// Line encoding for a sink
#[derive(Debug, Clone, Copy)]
enum LineFormat {
    Json,
    Simple,
}

struct Sink {
    target: LogTarget,
    min_level: Level,
    format: LineFormat,
}

/// Thread-safe log writer over error, combined and console sinks
pub struct LogWriter {
    sinks: Vec<Sink>,
}

impl LogWriter {
    /// Open the file sinks; the console sink is added when `console` is set.
    pub fn open(error_log_file: &str, combined_log_file: &str, console: bool) -> io::Result<Self> {
        let mut sinks = vec![
            Sink {
                target: LogTarget::File(Mutex::new(open_log_file(error_log_file)?)),
                min_level: Level::Error,
                format: LineFormat::Json,
            },
            Sink {
                target: LogTarget::File(Mutex::new(open_log_file(combined_log_file)?)),
                min_level: Level::Info,
                format: LineFormat::Json,
            },
        ];

        if console {
            sinks.push(Sink {
                target: LogTarget::Console,
                min_level: Level::Info,
                format: LineFormat::Simple,
            });
        }

        Ok(Self { sinks })
    }

    #[cfg(test)]
    fn has_console(&self) -> bool {
        self.sinks
            .iter()
            .any(|s| matches!(s.target, LogTarget::Console))
    }

    /// Write a record to every sink that accepts its level
    pub fn write(&self, record: &LogRecord<'_>) {
        let mut json = None;
        for sink in self.sinks.iter().filter(|s| record.level >= s.min_level) {
            let line = match sink.format {
                LineFormat::Json => json.get_or_insert_with(|| record.to_json()).clone(),
                LineFormat::Simple => record.to_simple(),
            };
            write_to_target(&sink.target, record.level, &line);
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write a line to a log target; failures are dropped
fn write_to_target(target: &LogTarget, level: Level, line: &str) {
    match target {
        LogTarget::Console => {
            if level >= Level::Error {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{line}");
            }
        }
    }
}
