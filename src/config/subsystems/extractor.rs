// src/config/subsystems/extractor.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::{FromIni, parse_bool};

pub const MIN_RESAMPLE: u32 = 16;
pub const MAX_RESAMPLE: u32 = 256;

/// Which samples feed the intensity histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorMode {
    /// One 8-bit luma sample per pixel.
    Luma,
    /// Every RGB channel value, three samples per pixel.
    Rgb,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Luma => "luma",
            ColorMode::Rgb => "rgb",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "luma" | "gray" | "grey" => Some(Self::Luma),
            "rgb" | "color" | "colour" => Some(Self::Rgb),
            _ => None,
        }
    }
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::Luma
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    // Largest side of the thumbnail the histogram is computed over
    pub resample: u32,

    // Append original width and height to the descriptor
    pub include_size: bool,

    pub bins: usize,
    pub color_mode: ColorMode,

    // Decoder allocation cap in bytes, None decodes images of any size
    pub max_decode_bytes: Option<u64>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            resample: 256,
            include_size: false,
            bins: 10,
            color_mode: ColorMode::default(),
            max_decode_bytes: None,
        }
    }
}

impl FromIni for ExtractorConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "extractor" {
            return None;
        }

        match key {
            "resample" => {
                match value.parse() {
                    Ok(size) if size > 0 => {
                        self.resample = size;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid resample (must be > 0): {}", value)
                    ))),
                }
            },
            "include_size" => {
                match parse_bool(value) {
                    Some(flag) => {
                        self.include_size = flag;
                        Some(Ok(()))
                    },
                    None => Some(Err(Error::Config(
                        format!("Invalid include_size value (must be true/false): {}", value)
                    ))),
                }
            },
            "bins" => {
                match value.parse() {
                    Ok(bins) if bins > 0 => {
                        self.bins = bins;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::Config(
                        format!("Invalid bins (must be > 0): {}", value)
                    ))),
                }
            },
            "color_mode" => {
                match ColorMode::from_str(value) {
                    Some(mode) => {
                        self.color_mode = mode;
                        Some(Ok(()))
                    },
                    None => Some(Err(Error::Config(
                        format!("Invalid color_mode (must be 'luma' or 'rgb'): {}", value)
                    ))),
                }
            },
            "max_decode_bytes" => {
                match value.parse::<u64>() {
                    Ok(0) => {
                        self.max_decode_bytes = None;
                        Some(Ok(()))
                    },
                    Ok(bytes) => {
                        self.max_decode_bytes = Some(bytes);
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid max_decode_bytes (0 means unlimited): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resample < MIN_RESAMPLE || self.resample > MAX_RESAMPLE {
            return Err(Error::invalid(format!(
                "resample should be a value between {} and {}, got {}",
                MIN_RESAMPLE, MAX_RESAMPLE, self.resample
            )));
        }
        if self.bins == 0 || self.bins > 256 {
            return Err(Error::invalid(format!(
                "bins must be between 1 and 256, got {}", self.bins
            )));
        }
        Ok(())
    }

    /// Length of every descriptor produced under this configuration.
    pub fn descriptor_len(&self) -> usize {
        if self.include_size {
            self.bins + 2
        } else {
            self.bins
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {} bins over thumbnails of at most {}px{}",
            self.bins,
            self.color_mode.as_str(),
            self.resample,
            if self.include_size { ", plus original size" } else { "" }
        )
    }
}
