//! Pipeline conversions module
//!
//! Orchestration from a raw data unit plus its metadata to a decoded
//! raster: validation, sample cast, normalization and decoder dispatch.

mod raw_to_raster;
pub mod types;


pub use raw_to_raster::RasterPipeline;
pub use types::{
    DecodeConfig, DecodeConfigBuilder, DecodedFrame, ImageMetadata, OutputShape, SampleRange,
};
