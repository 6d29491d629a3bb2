// src/utils/failure_log.rs
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use parking_lot::Mutex;
use log::{debug, warn};

/// Append-only record of images that were left out of a run.
pub struct FailureLog {
    file: Mutex<Option<File>>,
}

impl FailureLog {
    /// Logger that only reports through `log`; nothing is written to disk.
    pub fn disabled() -> Self {
        Self {
            file: Mutex::new(None),
        }
    }

    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        debug!("Initialized failure log at {:?}", path);
        Ok(Self {
            file: Mutex::new(Some(file)),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.file.lock().is_some()
    }

    pub fn record(&self, kind: &str, path: &Path, reason: &str) -> io::Result<()> {
        warn!("Error reading {:?}: {}", path, reason);

        let mut guard = self.file.lock();
        if let Some(file) = guard.as_mut() {
            // Format: [KIND] | PATH | REASON
            writeln!(
                file,
                "[{}] | {} | {}",
                kind,
                path.display(),
                reason.replace('\n', " ")
            )?;
            file.flush()?;
        }
        Ok(())
    }
}

impl Default for FailureLog {
    fn default() -> Self {
        Self::disabled()
    }
}
