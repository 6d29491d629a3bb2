//! imgroup sorts a folder of images into k visually similar groups.
//! Each image is reduced to an intensity histogram descriptor and the
//! descriptors are clustered with a nearest-centroid refinement loop.

// Module declarations
pub mod error;
pub mod types;
pub mod config;
pub mod features;
pub mod dataset;
pub mod cluster;
pub mod pipeline;
pub mod report;
pub mod utils;

// Re-exports
pub use error::{Error, Result};
pub use types::{Assignment, Dataset, DatasetItem, Descriptor};
pub use features::FeatureExtractor;
pub use dataset::{BuildReport, DatasetBuilder, ExtractionFailure};
pub use cluster::{ClusterRefiner, Centroid, DistanceMetric, RefinementOutcome, RefinementState};
pub use pipeline::{cluster_images, ClusterRun};
pub use report::RunReport;
pub use utils::processing::ProcessingManager;

// Re-export the config from config module
pub use config::GroupConfig;
