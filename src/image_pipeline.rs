//! Image processing pipeline module
//!
//! Decodes FITS data units into displayable rasters, with separate modules
//! for the sample model, output assembly, tiling, the plain and CFA
//! decoders, and the orchestration that dispatches between them.

pub mod common;
pub mod conversions;
pub mod debayer;
pub mod decoder;
pub mod parallel;
pub mod raster;
pub mod sample;

pub use common::{DecodeError, Result};

pub use sample::{data_range, normalize, Normalizer, PlaneView, RawPlane, Sample, SampleType};

pub use raster::{ByteOrder, Component, DecodedImage, PixelFormat, PixelLayout, PlanarImage};

pub use parallel::WorkerPool;

pub use decoder::{GrayscaleDecoder, PlanarDecoder};

pub use debayer::{CfaPattern, CpuDebayer, MosaicLayout};

pub use conversions::{
    DecodeConfig, DecodeConfigBuilder, DecodedFrame, ImageMetadata, OutputShape, RasterPipeline,
    SampleRange,
};
