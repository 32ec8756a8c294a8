//! Sample model
//!
//! Typed representations of the raw pixel encodings found in a FITS data
//! unit, the normalization contract that maps them onto `[0, 1]`, and the
//! big-endian cast that turns a raw byte buffer into a typed plane.

mod normalize;
mod plane;
pub mod types;

pub use normalize::{data_range, normalize, Normalizer, Sample};
pub use plane::{PlaneView, RawPlane};
pub use types::SampleType;
