use log::{info, debug};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::subsystems::processor::ProcessorConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingMode {
    Sequential,
    Parallel,
}

/// Owns the sizing decision for the extraction worker pool.
pub struct ProcessingManager {
    mode: ProcessingMode,
    max_concurrent: usize,
}

impl ProcessingManager {
    pub fn new(processing_config: &ProcessorConfig) -> Self {
        Self::with_workers(processing_config.effective_workers())
    }

    pub fn with_workers(workers: usize) -> Self {
        let max_concurrent = workers.max(1);
        let mode = if max_concurrent > 1 {
            ProcessingMode::Parallel
        } else {
            ProcessingMode::Sequential
        };

        Self { mode, max_concurrent }
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Dedicated pool so extraction never competes with rayon's global pool.
    pub fn build_pool(&self) -> Result<ThreadPool> {
        debug!("Building extraction pool with {} threads", self.max_concurrent);
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.max_concurrent)
            .thread_name(|i| format!("extract-{}", i))
            .build()?;
        info!("Processing mode: {:?}, max concurrent: {}", self.mode, self.max_concurrent);
        Ok(pool)
    }

    pub fn progress_bar(&self, total: usize) -> ProgressBar {
        let progress = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images ({eta})")
        {
            progress.set_style(style.progress_chars("=>-"));
        }
        progress
    }
}

impl Default for ProcessingManager {
    fn default() -> Self {
        Self::new(&ProcessorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_worker_is_sequential() {
        let manager = ProcessingManager::with_workers(1);
        assert_eq!(manager.mode(), ProcessingMode::Sequential);
        assert_eq!(ProcessingManager::with_workers(0).max_concurrent(), 1);
    }

    #[test]
    fn pool_has_requested_size() {
        let manager = ProcessingManager::with_workers(3);
        assert_eq!(manager.mode(), ProcessingMode::Parallel);
        let pool = manager.build_pool().unwrap();
        assert_eq!(pool.current_num_threads(), 3);
    }
}
