use serde::{Serialize, Deserialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Fixed-length histogram feature vector for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor(Vec<f64>);

impl Descriptor {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for Descriptor {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl AsRef<[f64]> for Descriptor {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    pub path: PathBuf,
    pub descriptor: Descriptor,
    pub label: usize,
}

/// Final (source path, cluster label) pair handed to placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub path: PathBuf,
    pub label: usize,
}

/// In-memory clustering state: descriptors plus the evolving partition.
#[derive(Debug, Clone)]
pub struct Dataset {
    items: Vec<DatasetItem>,
    k: usize,
    dimension: usize,
}

impl Dataset {
    /// Builds a dataset, checking that every descriptor has the same
    /// length and every label lies in `[0, k)`.
    pub fn new(items: Vec<DatasetItem>, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::invalid("cluster count must be at least 1"));
        }

        let dimension = items.first().map(|item| item.descriptor.len()).unwrap_or(0);
        for item in &items {
            if item.descriptor.len() != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    found: item.descriptor.len(),
                });
            }
            if item.label >= k {
                return Err(Error::invalid(format!(
                    "label {} out of range for k={} ({:?})",
                    item.label, k, item.path
                )));
            }
        }

        Ok(Self { items, k, dimension })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[DatasetItem] {
        &self.items
    }

    pub fn labels(&self) -> Vec<usize> {
        self.items.iter().map(|item| item.label).collect()
    }

    pub(crate) fn set_label(&mut self, index: usize, label: usize) {
        debug_assert!(label < self.k);
        self.items[index].label = label;
    }

    /// Number of members per label, indexed by label.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for item in &self.items {
            sizes[item.label] += 1;
        }
        sizes
    }

    pub fn non_empty_clusters(&self) -> usize {
        self.cluster_sizes().iter().filter(|&&size| size > 0).count()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.items
            .iter()
            .map(|item| Assignment {
                path: item.path.clone(),
                label: item.label,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, values: Vec<f64>, label: usize) -> DatasetItem {
        DatasetItem {
            path: PathBuf::from(name),
            descriptor: Descriptor::new(values),
            label,
        }
    }

    #[test]
    fn rejects_unequal_descriptor_lengths() {
        let items = vec![item("a", vec![1.0, 2.0], 0), item("b", vec![1.0], 1)];
        match Dataset::new(items, 2) {
            Err(Error::DimensionMismatch { expected, found }) => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn rejects_out_of_range_labels_and_zero_k() {
        assert!(Dataset::new(vec![item("a", vec![1.0], 2)], 2).is_err());
        assert!(matches!(
            Dataset::new(Vec::new(), 0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn reports_cluster_sizes() {
        let items = vec![
            item("a", vec![0.0], 0),
            item("b", vec![1.0], 0),
            item("c", vec![2.0], 2),
        ];
        let dataset = Dataset::new(items, 3).unwrap();
        assert_eq!(dataset.cluster_sizes(), vec![2, 0, 1]);
        assert_eq!(dataset.non_empty_clusters(), 2);
        assert_eq!(dataset.dimension(), 1);
        assert_eq!(dataset.assignments()[2].label, 2);
    }
}
