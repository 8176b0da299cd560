use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a growth run.
#[derive(Debug, Error)]
pub enum GrowthError {
    /// Rejected before the growth loop starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("cannot allocate a {size}x{size} grid")]
    ResourceExhaustion { size: usize },
    /// The snapshot consumer went away (viewer closed).
    #[error("snapshot sink closed")]
    SinkClosed,
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Config file import/export failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("png export failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("gif export failed: {0}")]
    Gif(#[from] gif::EncodingError),
    #[error("{size}x{size} grid at scale {scale} exceeds the gif frame limit")]
    FrameTooLarge { size: usize, scale: u32 },
}
