// src/config/subsystems/placement.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementMode {
    Copy,
    Move,
}

impl PlacementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementMode::Copy => "copy",
            PlacementMode::Move => "move",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "copy" => Some(Self::Copy),
            "move" => Some(Self::Move),
            _ => None,
        }
    }
}

impl Default for PlacementMode {
    fn default() -> Self {
        Self::Copy
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub mode: PlacementMode,

    // Cluster directories are created here, defaults to the input folder
    pub output_dir: Option<PathBuf>,

    // Matched case-sensitively, discovery keeps this order
    pub extensions: Vec<String>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            mode: PlacementMode::default(),
            output_dir: None,
            extensions: ["jpg", "JPG", "png", "jpeg"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl FromIni for PlacementConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "placement" {
            return None;
        }

        match key {
            "mode" => {
                match PlacementMode::from_str(value) {
                    Some(mode) => {
                        self.mode = mode;
                        Some(Ok(()))
                    },
                    None => Some(Err(Error::Config(
                        format!("Invalid mode (must be 'copy' or 'move'): {}", value)
                    ))),
                }
            },
            "output_dir" => {
                self.output_dir = Some(PathBuf::from(value.trim_matches('"')));
                Some(Ok(()))
            },
            "extensions" => {
                let extensions: Vec<String> = value
                    .split(',')
                    .map(|ext| ext.trim().trim_start_matches('.').to_string())
                    .filter(|ext| !ext.is_empty())
                    .collect();
                if extensions.is_empty() {
                    Some(Err(Error::Config("extensions list is empty".to_string())))
                } else {
                    self.extensions = extensions;
                    Some(Ok(()))
                }
            },
            _ => None,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(Error::config("at least one image extension is required"));
        }
        Ok(())
    }
}
