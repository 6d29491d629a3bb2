// src/cluster/distance.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};

/// Distance between two descriptors of equal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceMetric {
    Manhattan,
    /// Sum of per-dimension `sqrt(d^2)`. This is numerically the Manhattan
    /// distance, not the Euclidean norm; the formula is kept as-is.
    Euclidean,
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Euclidean => "euclidean",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "manhattan" | "l1" => Some(Self::Manhattan),
            "euclidean" | "euclidian" => Some(Self::Euclidean),
            _ => None,
        }
    }

    pub fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        match self {
            DistanceMetric::Manhattan => manhattan_distance(a, b),
            DistanceMetric::Euclidean => euclidean_distance(a, b),
        }
    }
}

impl Default for DistanceMetric {
    fn default() -> Self {
        Self::Manhattan
    }
}

fn check_dimensions(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(())
}

pub fn manhattan_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum())
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| ((x - y) * (x - y)).sqrt()).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    fn random_vec(rng: &mut StdRng, len: usize) -> Vec<f64> {
        (0..len).map(|_| rng.gen_range(-100.0..100.0)).collect()
    }

    #[test]
    fn manhattan_sums_absolute_differences() {
        let d = manhattan_distance(&[1.0, 5.0, -2.0], &[4.0, 1.0, -2.0]).unwrap();
        assert_eq!(d, 7.0);
    }

    #[test]
    fn euclidean_formula_matches_manhattan() {
        let a = [3.0, 0.0];
        let b = [0.0, 4.0];
        assert_eq!(euclidean_distance(&a, &b).unwrap(), 7.0);
        assert_eq!(DistanceMetric::Euclidean.distance(&a, &b).unwrap(), 7.0);
    }

    #[test]
    fn unequal_lengths_are_rejected() {
        for metric in [DistanceMetric::Manhattan, DistanceMetric::Euclidean] {
            match metric.distance(&[1.0, 2.0], &[1.0]) {
                Err(Error::DimensionMismatch { expected: 2, found: 1 }) => {}
                other => panic!("{:?}: expected mismatch, got {:?}", metric, other),
            }
        }
    }

    #[test]
    fn non_negative_symmetric_and_zero_on_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let len = rng.gen_range(1..24);
            let x = random_vec(&mut rng, len);
            let y = random_vec(&mut rng, len);
            for metric in [DistanceMetric::Manhattan, DistanceMetric::Euclidean] {
                let xy = metric.distance(&x, &y).unwrap();
                let yx = metric.distance(&y, &x).unwrap();
                assert!(xy >= 0.0);
                assert_eq!(xy, yx);
                assert_eq!(metric.distance(&x, &x).unwrap(), 0.0);
            }
        }
    }
}
