// src/report.rs

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use log::info;

use crate::cluster::RefinementState;
use crate::config::GroupConfig;
use crate::error::Result;
use crate::pipeline::ClusterRun;
use crate::types::Assignment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub path: PathBuf,
    pub error: String,
}

/// JSON manifest of one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub k: usize,
    pub resample: u32,
    pub include_size: bool,
    pub metric: String,
    pub passes: usize,
    pub state: RefinementState,
    pub cluster_sizes: Vec<usize>,
    pub assignments: Vec<Assignment>,
    pub failures: Vec<FailureEntry>,
}

impl RunReport {
    pub fn new(config: &GroupConfig, run: &ClusterRun) -> Self {
        Self {
            k: config.refiner.clusters,
            resample: config.extractor.resample,
            include_size: config.extractor.include_size,
            metric: config.refiner.metric.as_str().to_string(),
            passes: run.outcome.passes,
            state: run.outcome.state,
            cluster_sizes: run.cluster_sizes.clone(),
            assignments: run.assignments.clone(),
            failures: run
                .failures
                .iter()
                .map(|f| FailureEntry {
                    path: f.path.clone(),
                    error: f.error.reason(),
                })
                .collect(),
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Wrote run report to {:?}", path);
        Ok(())
    }
}
