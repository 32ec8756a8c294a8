//! Per-band output writers.
//!
//! Colour decoders produce one normalized `[r, g, b]` triple per pixel and
//! hand it to a sink, which owns the band's slice of the output and knows
//! the layout. Indices are pixel offsets relative to the first row of the
//! band.

use std::ops::Range;

use crate::image_pipeline::common::error::{DecodeError, Result};
use crate::image_pipeline::parallel::WorkerPool;
use crate::image_pipeline::raster::component::Component;
use crate::image_pipeline::raster::types::PixelLayout;

/// BT.709 luma weights for R, G and B.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

#[inline(always)]
pub fn luma([r, g, b]: [f32; 3]) -> f32 {
    LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b
}

pub(crate) trait RgbSink {
    fn put(&mut self, index: usize, rgb: [f32; 3]);
}

/// A per-pixel colour transform that can run on any band of rows.
pub(crate) trait BandKernel: Sync {
    fn run_band<S: RgbSink>(&self, rows: Range<usize>, sink: &mut S);
}

/// Runs `kernel` over every `(band, output)` pair, wrapping each output
/// slice in the sink built by `sink`.
pub(crate) fn run_bands<K, W, S, F>(pool: &WorkerPool, kernel: &K, work: Vec<(Range<usize>, W)>, sink: F)
where
    K: BandKernel,
    W: Send,
    S: RgbSink,
    F: Fn(W) -> S + Sync,
{
    pool.for_each_band(work, |rows, out| kernel.run_band(rows, &mut sink(out)));
}

/// Output buffers must match the decoded size exactly.
pub(crate) fn check_output(len: usize, expected: usize) -> Result<()> {
    if len != expected {
        return Err(DecodeError::InvalidMetadata(format!(
            "output buffer holds {} components, expected {}",
            len, expected
        )));
    }
    Ok(())
}

/// Writes into one interleaved buffer in the given layout.
pub(crate) struct InterleavedSink<'a, C> {
    out: &'a mut [C],
    channels: usize,
    offsets: Option<[usize; 3]>,
    alpha: Option<(usize, C)>,
}

impl<'a, C: Component> InterleavedSink<'a, C> {
    pub fn new(out: &'a mut [C], layout: PixelLayout, alpha: f32) -> Self {
        Self {
            out,
            channels: layout.channels(),
            offsets: layout.color_offsets(),
            alpha: layout.alpha_offset().map(|at| (at, C::from_unit(alpha))),
        }
    }
}

impl<C: Component> RgbSink for InterleavedSink<'_, C> {
    #[inline(always)]
    fn put(&mut self, index: usize, rgb: [f32; 3]) {
        let base = index * self.channels;
        match self.offsets {
            Some([r, g, b]) => {
                self.out[base + r] = C::from_unit(rgb[0]);
                self.out[base + g] = C::from_unit(rgb[1]);
                self.out[base + b] = C::from_unit(rgb[2]);
                if let Some((at, value)) = self.alpha {
                    self.out[base + at] = value;
                }
            }
            None => self.out[base] = C::from_unit(luma(rgb)),
        }
    }
}

/// Writes into three separate planes.
pub(crate) struct PlanarSink<'a, C> {
    red: &'a mut [C],
    green: &'a mut [C],
    blue: &'a mut [C],
}

impl<'a, C: Component> PlanarSink<'a, C> {
    pub fn new(red: &'a mut [C], green: &'a mut [C], blue: &'a mut [C]) -> Self {
        Self { red, green, blue }
    }
}

impl<C: Component> RgbSink for PlanarSink<'_, C> {
    #[inline(always)]
    fn put(&mut self, index: usize, [r, g, b]: [f32; 3]) {
        self.red[index] = C::from_unit(r);
        self.green[index] = C::from_unit(g);
        self.blue[index] = C::from_unit(b);
    }
}
