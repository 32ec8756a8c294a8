use thiserror::Error;

use crate::image_pipeline::debayer::CfaPattern;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid image metadata: {0}")]
    InvalidMetadata(String),

    #[error("Missing image data: {0}")]
    MissingData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported pixel layout: {0}")]
    UnsupportedLayout(String),

    #[error("Degenerate sample range: min={min}, max={max}")]
    DegenerateRange { min: f64, max: f64 },

    #[error("CFA pattern {0:?} is not implemented")]
    UnsupportedPattern(CfaPattern),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
