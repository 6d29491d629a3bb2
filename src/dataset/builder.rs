// src/dataset/builder.rs

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use indicatif::{ParallelProgressIterator, ProgressBar};
use log::{info, debug};
use rayon::prelude::*;

use crate::config::subsystems::InitialAssignment;
use crate::error::{Error, Result};
use crate::features::FeatureExtractor;
use crate::types::{Dataset, DatasetItem, Descriptor};
use crate::utils::failure_log::FailureLog;
use crate::utils::processing::ProcessingManager;

/// An image left out of the dataset, with the reason.
#[derive(Debug)]
pub struct ExtractionFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug)]
pub struct BuildReport {
    pub dataset: Dataset,
    pub failures: Vec<ExtractionFailure>,
}

/// Runs feature extraction over every input path on a bounded pool and
/// assembles the starting dataset.
pub struct DatasetBuilder {
    extractor: FeatureExtractor,
    k: usize,
    assignment: InitialAssignment,
    manager: ProcessingManager,
    failure_log: FailureLog,
}

impl DatasetBuilder {
    pub fn new(extractor: FeatureExtractor, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::invalid("cluster count must be at least 1"));
        }
        Ok(Self {
            extractor,
            k,
            assignment: InitialAssignment::default(),
            manager: ProcessingManager::default(),
            failure_log: FailureLog::disabled(),
        })
    }

    pub fn initial_assignment(mut self, assignment: InitialAssignment) -> Self {
        self.assignment = assignment;
        self
    }

    pub fn processing(mut self, manager: ProcessingManager) -> Self {
        self.manager = manager;
        self
    }

    pub fn failure_log(mut self, failure_log: FailureLog) -> Self {
        self.failure_log = failure_log;
        self
    }

    pub fn build(&self, paths: &[PathBuf], progress: &ProgressBar) -> Result<BuildReport> {
        info!("Extracting descriptors from {} images ({})",
            paths.len(), self.extractor.config().describe());

        let pool = self.manager.build_pool()?;
        let completed = AtomicUsize::new(0);
        let k = self.k;

        let results: Vec<(PathBuf, Result<(Descriptor, Option<usize>)>)> = pool.install(|| {
            paths
                .par_iter()
                .map(|path| {
                    let result = self.extractor.extract(path).map(|descriptor| {
                        let label = match self.assignment {
                            InitialAssignment::CompletionOrder => {
                                Some(completed.fetch_add(1, Ordering::SeqCst) % k)
                            }
                            InitialAssignment::InputOrder => None,
                        };
                        (descriptor, label)
                    });
                    if let Err(e) = &result {
                        if e.is_recoverable() {
                            if let Err(io) = self.failure_log.record("DECODE", path, &e.reason()) {
                                log::warn!("Could not write failure log entry: {}", io);
                            }
                        }
                    }
                    (path.clone(), result)
                })
                .progress_with(progress.clone())
                .collect()
        });

        let expected_len = self.extractor.descriptor_len();
        let mut items = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for (path, result) in results {
            match result {
                Ok((descriptor, label)) => {
                    if descriptor.len() != expected_len {
                        return Err(Error::DimensionMismatch {
                            expected: expected_len,
                            found: descriptor.len(),
                        });
                    }
                    let label = label.unwrap_or(items.len() % k);
                    items.push(DatasetItem { path, descriptor, label });
                }
                Err(error) if error.is_recoverable() => {
                    failures.push(ExtractionFailure { path, error });
                }
                Err(error) => return Err(error),
            }
        }

        debug!("Initial cluster sizes: {:?}", {
            let mut sizes = vec![0usize; k];
            for item in &items {
                sizes[item.label] += 1;
            }
            sizes
        });
        info!("Extracted {} descriptors, {} images excluded", items.len(), failures.len());

        let dataset = Dataset::new(items, k)?;
        Ok(BuildReport { dataset, failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::subsystems::ExtractorConfig;
    use image::{GrayImage, Luma};
    use std::path::Path;

    fn write_gray(dir: &Path, name: &str, value: u8) -> PathBuf {
        let path = dir.join(name);
        GrayImage::from_pixel(12, 12, Luma([value])).save(&path).unwrap();
        path
    }

    fn builder(k: usize, workers: usize) -> DatasetBuilder {
        let extractor = FeatureExtractor::new(ExtractorConfig {
            resample: 32,
            ..ExtractorConfig::default()
        })
        .unwrap();
        DatasetBuilder::new(extractor, k)
            .unwrap()
            .processing(ProcessingManager::with_workers(workers))
    }

    #[test]
    fn input_order_labels_are_round_robin() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..7)
            .map(|i| write_gray(dir.path(), &format!("{}.png", i), (i * 30) as u8))
            .collect();

        let report = builder(3, 4).build(&paths, &ProgressBar::hidden()).unwrap();
        assert!(report.failures.is_empty());
        assert_eq!(report.dataset.labels(), vec![0, 1, 2, 0, 1, 2, 0]);
        let order: Vec<&PathBuf> = report.dataset.items().iter().map(|i| &i.path).collect();
        assert_eq!(order, paths.iter().collect::<Vec<_>>());
    }

    #[test]
    fn completion_order_labels_stay_balanced() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..9)
            .map(|i| write_gray(dir.path(), &format!("{}.png", i), 100))
            .collect();

        let report = builder(3, 3)
            .initial_assignment(InitialAssignment::CompletionOrder)
            .build(&paths, &ProgressBar::hidden())
            .unwrap();
        assert_eq!(report.dataset.cluster_sizes(), vec![3, 3, 3]);
    }

    #[test]
    fn undecodable_files_are_excluded_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_gray(dir.path(), "good.png", 10);
        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"not an image").unwrap();
        let log_path = dir.path().join("failures.log");

        let progress = ProgressBar::hidden();
        let report = builder(2, 2)
            .failure_log(FailureLog::open(&log_path).unwrap())
            .build(&[bad.clone(), good.clone()], &progress)
            .unwrap();

        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.dataset.items()[0].path, good);
        assert_eq!(report.dataset.items()[0].label, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, bad);
        assert_eq!(progress.position(), 2);
        assert!(std::fs::read_to_string(&log_path).unwrap().contains("bad.png"));
    }

    #[test]
    fn progress_ticks_once_per_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths: Vec<PathBuf> = (0..5)
            .map(|i| write_gray(dir.path(), &format!("{}.png", i), (i * 50) as u8))
            .collect();
        let bad = dir.path().join("broken.png");
        std::fs::write(&bad, b"\x89PNG truncated").unwrap();
        paths.push(bad);

        let progress = ProgressBar::hidden();
        progress.set_length(paths.len() as u64);
        let report = builder(2, 3).build(&paths, &progress).unwrap();

        assert_eq!(report.dataset.len() + report.failures.len(), paths.len());
        assert_eq!(progress.position(), paths.len() as u64);
        assert_eq!(progress.length(), Some(paths.len() as u64));
    }

    #[test]
    fn zero_clusters_is_rejected() {
        let extractor = FeatureExtractor::new(ExtractorConfig::default()).unwrap();
        assert!(matches!(DatasetBuilder::new(extractor, 0), Err(Error::InvalidParameter(_))));
    }
}
