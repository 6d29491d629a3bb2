// src/config/subsystems/refiner.rs

use serde::{Serialize, Deserialize};
use crate::cluster::DistanceMetric;
use crate::error::{Error, Result};
use crate::config::FromIni;

/// How the starting partition is produced from extraction results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitialAssignment {
    /// Round robin over input order once extraction is finished.
    InputOrder,
    /// Round robin over extraction completion order (varies between runs).
    CompletionOrder,
}

impl InitialAssignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitialAssignment::InputOrder => "input_order",
            InitialAssignment::CompletionOrder => "completion_order",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "input_order" | "input" => Some(Self::InputOrder),
            "completion_order" | "completion" => Some(Self::CompletionOrder),
            _ => None,
        }
    }
}

impl Default for InitialAssignment {
    fn default() -> Self {
        Self::InputOrder
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinerConfig {
    // Number of clusters (k)
    pub clusters: usize,

    pub metric: DistanceMetric,

    // None runs until convergence
    pub max_passes: Option<usize>,

    pub initial_assignment: InitialAssignment,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            clusters: 5,
            metric: DistanceMetric::Manhattan,
            max_passes: None,
            initial_assignment: InitialAssignment::default(),
        }
    }
}

impl FromIni for RefinerConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "refiner" {
            return None;
        }

        match key {
            "clusters" | "k" => {
                match value.parse() {
                    Ok(k) if k > 0 => {
                        self.clusters = k;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid clusters (must be > 0): {}", value)
                    ))),
                }
            },
            "metric" => {
                match DistanceMetric::from_str(value) {
                    Some(metric) => {
                        self.metric = metric;
                        Some(Ok(()))
                    },
                    None => Some(Err(Error::Config(
                        format!("Invalid metric (must be 'manhattan' or 'euclidean'): {}", value)
                    ))),
                }
            },
            "max_passes" => {
                match value.parse::<usize>() {
                    Ok(0) => {
                        self.max_passes = None;
                        Some(Ok(()))
                    },
                    Ok(passes) => {
                        self.max_passes = Some(passes);
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid max_passes (0 means unlimited): {}", value)
                    ))),
                }
            },
            "initial_assignment" => {
                match InitialAssignment::from_str(value) {
                    Some(assignment) => {
                        self.initial_assignment = assignment;
                        Some(Ok(()))
                    },
                    None => Some(Err(Error::Config(
                        format!("Invalid initial_assignment (must be 'input_order' or 'completion_order'): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

impl RefinerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.clusters == 0 {
            return Err(Error::invalid("clusters must be greater than 0"));
        }
        if self.max_passes == Some(0) {
            return Err(Error::invalid("max_passes must be greater than 0 when set"));
        }
        Ok(())
    }
}
