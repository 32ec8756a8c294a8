//! Decoders for frames that are not mosaiced
//!
//! Single-layer frames go through the grayscale decoder, three-layer frames
//! (R, G, B planes in storage order) through the planar decoder.

mod grayscale;
mod planar;

pub use grayscale::GrayscaleDecoder;
pub use planar::PlanarDecoder;
