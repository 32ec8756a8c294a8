//! Output assembly
//!
//! Decoded buffers handed to a renderer: the flat interleaved buffer tagged
//! with its pixel layout, or three separate colour planes.

mod component;
pub(crate) mod sink;
pub mod types;

pub use component::Component;
pub use sink::{luma, LUMA_WEIGHTS};
pub use types::{AlphaPosition, ByteOrder, DecodedImage, PixelFormat, PixelLayout, PlanarImage};
