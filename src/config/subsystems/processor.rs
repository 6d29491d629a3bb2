// src/config/subsystems/processor.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use log::LevelFilter;
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    // Extraction worker threads, 0 uses every available core
    pub workers: usize,

    pub log_level: String,
    pub log_dir: Option<PathBuf>,

    // Append-only record of images excluded from the run
    pub failure_log: Option<PathBuf>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            log_level: "info".to_string(),
            log_dir: None,
            failure_log: None,
        }
    }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        "none" | "off" => Some(LevelFilter::Off),
        _ => None,
    }
}

impl FromIni for ProcessorConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "processor" {
            return None;
        }

        match key {
            "workers" => {
                match value.parse() {
                    Ok(workers) => {
                        self.workers = workers;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid workers (0 means all cores): {}", value)
                    ))),
                }
            },
            "log_level" => {
                match parse_level(value) {
                    Some(_) => {
                        self.log_level = value.trim().to_lowercase();
                        Some(Ok(()))
                    },
                    None => Some(Err(Error::Config(
                        format!("Invalid log level '{}'. Must be one of: none, error, warn, info, debug, trace", value)
                    ))),
                }
            },
            "log_dir" => {
                self.log_dir = Some(PathBuf::from(value.trim_matches('"')));
                Some(Ok(()))
            },
            "failure_log" => {
                self.failure_log = Some(PathBuf::from(value.trim_matches('"')));
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl ProcessorConfig {
    pub fn get_log_level(&self) -> LevelFilter {
        parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Worker count with the 0 = all cores default resolved.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }

    pub fn validate(&self) -> Result<()> {
        if parse_level(&self.log_level).is_none() {
            return Err(Error::config(format!("Unknown log level: {}", self.log_level)));
        }
        Ok(())
    }
}
