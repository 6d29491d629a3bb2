use thiserror::Error;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Descriptor dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("No images found in {0:?}")]
    EmptyInput(PathBuf),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Placement error: {0}")]
    Placement(String),
}

// Type alias for Result
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error conversions
impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Error::InvalidParameter(msg.into())
    }

    pub fn placement<S: Into<String>>(msg: S) -> Self {
        Error::Placement(msg.into())
    }

    pub fn decode<P: Into<PathBuf>>(path: P, source: image::ImageError) -> Self {
        Error::Decode { path: path.into(), source }
    }

    /// Message without the image path, for sinks that print the path
    /// alongside it.
    pub fn reason(&self) -> String {
        match self {
            Error::Decode { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }

    /// Per-image failures are recoverable; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(format!("Thread pool build failed: {}", err))
    }
}
