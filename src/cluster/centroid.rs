// src/cluster/centroid.rs

use crate::error::Result;
use crate::types::Dataset;
use super::distance::DistanceMetric;

/// Per-cluster reference point for reassignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Centroid {
    /// Per-dimension mean over the cluster's members.
    Mean(Vec<f64>),
    /// No member holds this label. Its distance is unbounded, so it is never
    /// the nearest centroid and the cluster stays empty from here on.
    Empty,
}

impl Centroid {
    pub fn is_empty(&self) -> bool {
        matches!(self, Centroid::Empty)
    }

    /// Distance from a descriptor, `f64::INFINITY` for an empty centroid.
    pub fn distance_from(&self, metric: DistanceMetric, descriptor: &[f64]) -> Result<f64> {
        match self {
            Centroid::Mean(values) => metric.distance(descriptor, values),
            Centroid::Empty => Ok(f64::INFINITY),
        }
    }
}

/// Recomputes every centroid from scratch for the dataset's current
/// partition. The result always has exactly `k` entries.
pub fn estimate_centroids(dataset: &Dataset) -> Result<Vec<Centroid>> {
    let k = dataset.k();
    let dim = dataset.dimension();
    let mut sums = vec![vec![0.0f64; dim]; k];
    let mut counts = vec![0usize; k];

    for item in dataset.items() {
        let values = item.descriptor.as_slice();
        if values.len() != dim {
            return Err(crate::error::Error::DimensionMismatch {
                expected: dim,
                found: values.len(),
            });
        }
        let sum = &mut sums[item.label];
        for (acc, v) in sum.iter_mut().zip(values) {
            *acc += v;
        }
        counts[item.label] += 1;
    }

    Ok(sums
        .into_iter()
        .zip(counts)
        .map(|(mut sum, count)| {
            if count == 0 {
                Centroid::Empty
            } else {
                let n = count as f64;
                for v in sum.iter_mut() {
                    *v /= n;
                }
                Centroid::Mean(sum)
            }
        })
        .collect())
}
