pub mod builder;

pub use builder::{BuildReport, DatasetBuilder, ExtractionFailure};
