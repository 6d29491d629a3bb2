pub mod extractor;
pub mod refiner;
pub mod processor;
pub mod placement;

pub use extractor::{ExtractorConfig, ColorMode};
pub use refiner::{RefinerConfig, InitialAssignment};
pub use processor::ProcessorConfig;
pub use placement::{PlacementConfig, PlacementMode};
