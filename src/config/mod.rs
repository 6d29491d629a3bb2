pub mod subsystems;

use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use crate::error::Result;
use log::{warn, trace};

pub trait FromIni {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupConfig {
    pub extractor: subsystems::ExtractorConfig,
    pub refiner: subsystems::RefinerConfig,
    pub processor: subsystems::ProcessorConfig,
    pub placement: subsystems::PlacementConfig,
}

impl GroupConfig {
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate()?;
        self.refiner.validate()?;
        self.processor.validate()?;
        self.placement.validate()?;
        Ok(())
    }

    pub fn from_ini<P: AsRef<Path>>(path: P) -> Result<Self> {
        let absolute_path = std::fs::canonicalize(&path)
            .unwrap_or_else(|_| path.as_ref().to_path_buf());

        trace!("Loading configuration from: {:?}", absolute_path);

        let content = fs::read_to_string(&path)?;
        let config = Self::from_ini_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses INI text on top of the defaults. Values that fail to parse are
    /// reported and skipped; validation is left to the caller.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut current_section = String::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len()-1].trim().to_string();
                trace!("  Line {}: Found section: [{}]", line_num + 1, current_section);
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                if let Some(result) = match current_section.as_str() {
                    "extractor" => config.extractor.from_ini_section(&current_section, key, value),
                    "refiner" => config.refiner.from_ini_section(&current_section, key, value),
                    "processor" => config.processor.from_ini_section(&current_section, key, value),
                    "placement" => config.placement.from_ini_section(&current_section, key, value),
                    _ => None,
                } {
                    if let Err(e) = result {
                        warn!("Error processing config key {}={}: {}", key, value, e);
                    }
                } else {
                    warn!("Unrecognized config key: {}={} in section [{}]", key, value, current_section);
                }
            }
        }

        Ok(config)
    }
}

/// Parses a boolean INI value, accepting the usual spellings.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::subsystems::{ColorMode, InitialAssignment, PlacementMode};
    use crate::cluster::DistanceMetric;
    use std::io::Write;

    #[test]
    fn parses_all_sections() {
        let ini = r#"
# clustering run
[extractor]
resample = 64
include_size = yes
bins = 16
color_mode = rgb

[refiner]
clusters = 3
metric = euclidean
max_passes = 40
initial_assignment = completion_order

[processor]
workers = 2
log_level = debug
failure_log = "logs/failed.log"

[placement]
mode = move
output_dir = "out"
extensions = png, jpg
"#;
        let config = GroupConfig::from_ini_str(ini).unwrap();
        assert_eq!(config.extractor.resample, 64);
        assert!(config.extractor.include_size);
        assert_eq!(config.extractor.bins, 16);
        assert_eq!(config.extractor.color_mode, ColorMode::Rgb);
        assert_eq!(config.refiner.clusters, 3);
        assert_eq!(config.refiner.metric, DistanceMetric::Euclidean);
        assert_eq!(config.refiner.max_passes, Some(40));
        assert_eq!(config.refiner.initial_assignment, InitialAssignment::CompletionOrder);
        assert_eq!(config.processor.workers, 2);
        assert_eq!(config.processor.get_log_level(), log::LevelFilter::Debug);
        assert_eq!(config.processor.failure_log.as_deref(), Some(Path::new("logs/failed.log")));
        assert_eq!(config.placement.mode, PlacementMode::Move);
        assert_eq!(config.placement.output_dir.as_deref(), Some(Path::new("out")));
        assert_eq!(config.placement.extensions, vec!["png".to_string(), "jpg".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bad_values_keep_defaults() {
        let ini = "[extractor]\nresample = lots\n[refiner]\nclusters = 0\nunknown = 1\n";
        let config = GroupConfig::from_ini_str(ini).unwrap();
        assert_eq!(config.extractor.resample, 256);
        assert_eq!(config.refiner.clusters, 5);
    }

    #[test]
    fn from_ini_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[extractor]\nresample = 512").unwrap();
        assert!(GroupConfig::from_ini(file.path()).is_err());
    }
}
