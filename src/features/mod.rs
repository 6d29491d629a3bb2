pub mod extractor;

pub use extractor::{histogram, FeatureExtractor};
