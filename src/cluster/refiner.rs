// src/cluster/refiner.rs

use serde::{Serialize, Deserialize};
use log::{debug, info, warn};

use crate::config::subsystems::RefinerConfig;
use crate::error::Result;
use crate::types::Dataset;
use super::centroid::{estimate_centroids, Centroid};
use super::distance::DistanceMetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefinementState {
    Refining,
    Converged,
    /// Stopped by the configured pass cap before a stable partition.
    PassLimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementOutcome {
    pub state: RefinementState,
    pub passes: usize,
    pub reassignments: usize,
}

impl RefinementOutcome {
    pub fn converged(&self) -> bool {
        self.state == RefinementState::Converged
    }
}

/// Nearest-centroid reassignment loop run until no label changes.
#[derive(Debug, Clone)]
pub struct ClusterRefiner {
    metric: DistanceMetric,
    max_passes: Option<usize>,
}

impl ClusterRefiner {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric, max_passes: None }
    }

    pub fn from_config(config: &RefinerConfig) -> Self {
        Self {
            metric: config.metric,
            max_passes: config.max_passes,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn refine(&self, dataset: &mut Dataset) -> Result<RefinementOutcome> {
        info!("Refining {} items into {} clusters ({} distance)",
            dataset.len(), dataset.k(), self.metric.as_str());

        let mut state = RefinementState::Refining;
        let mut passes = 0;
        let mut reassignments = 0;

        while state == RefinementState::Refining {
            if let Some(limit) = self.max_passes {
                if passes >= limit {
                    warn!("Stopping refinement after {} passes without convergence", passes);
                    state = RefinementState::PassLimitReached;
                    break;
                }
            }

            let changed = self.pass(dataset)?;
            passes += 1;
            reassignments += changed;
            debug!("Pass {}: {} labels changed, cluster sizes {:?}",
                passes, changed, dataset.cluster_sizes());

            if changed == 0 {
                state = RefinementState::Converged;
            }
        }

        info!("Refinement finished after {} passes ({} reassignments), {} of {} clusters non-empty",
            passes, reassignments, dataset.non_empty_clusters(), dataset.k());

        Ok(RefinementOutcome { state, passes, reassignments })
    }

    /// One reassignment pass over every item. Returns the number of changed
    /// labels.
    pub fn pass(&self, dataset: &mut Dataset) -> Result<usize> {
        let centroids = estimate_centroids(dataset)?;
        let mut changed = 0;

        for index in 0..dataset.len() {
            let item = &dataset.items()[index];
            let current = item.label;
            let nearest = self.nearest(&centroids, item.descriptor.as_slice())?;
            match nearest {
                Some(label) if label != current => {
                    dataset.set_label(index, label);
                    changed += 1;
                }
                _ => {}
            }
        }

        Ok(changed)
    }

    /// Index of the closest non-empty centroid, lowest index on ties.
    pub fn nearest(&self, centroids: &[Centroid], descriptor: &[f64]) -> Result<Option<usize>> {
        let mut best: Option<(usize, f64)> = None;
        for (label, centroid) in centroids.iter().enumerate() {
            if centroid.is_empty() {
                continue;
            }
            let d = centroid.distance_from(self.metric, descriptor)?;
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((label, d)),
            }
        }
        Ok(best.map(|(label, _)| label))
    }
}

impl Default for ClusterRefiner {
    fn default() -> Self {
        Self::new(DistanceMetric::Manhattan)
    }
}
