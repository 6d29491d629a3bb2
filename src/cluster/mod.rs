pub mod centroid;
pub mod distance;
pub mod refiner;

pub use centroid::{estimate_centroids, Centroid};
pub use distance::{euclidean_distance, manhattan_distance, DistanceMetric};
pub use refiner::{ClusterRefiner, RefinementOutcome, RefinementState};
