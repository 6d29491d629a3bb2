// src/pipeline.rs

use std::path::PathBuf;
use indicatif::ProgressBar;
use log::info;

use crate::cluster::{ClusterRefiner, RefinementOutcome};
use crate::config::GroupConfig;
use crate::dataset::{DatasetBuilder, ExtractionFailure};
use crate::error::Result;
use crate::features::FeatureExtractor;
use crate::types::Assignment;
use crate::utils::failure_log::FailureLog;
use crate::utils::processing::ProcessingManager;

/// Everything a caller needs after clustering a set of images.
#[derive(Debug)]
pub struct ClusterRun {
    pub assignments: Vec<Assignment>,
    pub failures: Vec<ExtractionFailure>,
    pub outcome: RefinementOutcome,
    pub cluster_sizes: Vec<usize>,
}

impl ClusterRun {
    pub fn non_empty_clusters(&self) -> usize {
        self.cluster_sizes.iter().filter(|&&size| size > 0).count()
    }
}

/// Extracts descriptors for `paths`, builds the starting partition and
/// refines it. Decode failures are collected, never fatal.
pub fn cluster_images(paths: &[PathBuf], config: &GroupConfig, progress: &ProgressBar) -> Result<ClusterRun> {
    config.validate()?;

    let extractor = FeatureExtractor::new(config.extractor.clone())?;
    let failure_log = match &config.processor.failure_log {
        Some(path) => FailureLog::open(path)?,
        None => FailureLog::disabled(),
    };

    let builder = DatasetBuilder::new(extractor, config.refiner.clusters)?
        .initial_assignment(config.refiner.initial_assignment)
        .processing(ProcessingManager::new(&config.processor))
        .failure_log(failure_log);

    let report = builder.build(paths, progress)?;
    let mut dataset = report.dataset;

    let refiner = ClusterRefiner::from_config(&config.refiner);
    let outcome = refiner.refine(&mut dataset)?;

    let cluster_sizes = dataset.cluster_sizes();
    info!("Cluster sizes: {:?}", cluster_sizes);

    Ok(ClusterRun {
        assignments: dataset.assignments(),
        failures: report.failures,
        outcome,
        cluster_sizes,
    })
}
