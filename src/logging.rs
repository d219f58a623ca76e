use log::{LevelFilter, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use chrono::Local;
use crate::error::{Error, Result};

/// Appends timestamped records to a file.
pub struct Logger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Logger {
    pub fn new(log_file: &Path, level: LevelFilter) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            // Nowhere to report a failed log write.
            let _ = writeln!(
                file,
                "{} [{}] {}: {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Logs to `log_file` when given, otherwise to stderr through env_logger
/// (`RUST_LOG` still wins over the default level there).
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let level = level_for(debug);
    match log_file {
        Some(path) => {
            let logger = Logger::new(path, level)?;
            log::set_boxed_logger(Box::new(logger))
                .map_err(|e| Error::Config(format!("Logger already set: {}", e)))?;
            log::set_max_level(level);
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .try_init()
                .map_err(|e| Error::Config(format!("Logger already set: {}", e)))?;
        }
    }
    Ok(())
}
