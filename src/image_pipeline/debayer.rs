//! Debayering module for converting CFA mosaics to RGB
//!
//! A single bilinear routine handles every supported pattern. The four 2x2
//! Bayer arrangements reduce to two block shapes with red and blue either in
//! place or swapped, and the quad-Bayer storage order only changes how a
//! logical position is addressed.

mod bilinear;
pub mod cpu_debayer;
mod mosaic;
mod split;
pub mod stencil;
pub mod types;


pub use cpu_debayer::CpuDebayer;
pub use mosaic::to_storage_order;
pub use stencil::Stencil;
pub use types::{CfaPattern, Color, MosaicLayout};
