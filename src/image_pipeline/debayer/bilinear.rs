//! Bilinear CFA interpolation over 2x2 blocks.
//!
//! Each block at an even origin carries one native sample per position. The
//! two missing colours of a position are the mean of the nearest
//! same-coloured samples under one of four stencils; which stencil applies
//! is fixed by the position inside the block and the block kind.

use std::ops::Range;

use crate::image_pipeline::debayer::mosaic::Mosaic;
use crate::image_pipeline::debayer::stencil::Stencil::{self, Cross, Horizontal, Plus, Vertical};
use crate::image_pipeline::debayer::stencil::{PixelClass, StencilTable};
use crate::image_pipeline::debayer::types::{BlockKind, BlockRoles};
use crate::image_pipeline::raster::sink::{BandKernel, RgbSink};
use crate::image_pipeline::sample::{Normalizer, Sample};

/// Read-only interpolation state shared by every band of one call.
pub(crate) struct Bilinear<'a, T, M> {
    samples: &'a [T],
    width: usize,
    height: usize,
    mosaic: M,
    norm: Normalizer<T>,
    roles: BlockRoles,
    table: StencilTable,
}

impl<'a, T: Sample, M: Mosaic> Bilinear<'a, T, M> {
    /// `width` and `height` must be even and at least 2.
    pub fn new(
        samples: &'a [T],
        width: usize,
        height: usize,
        mosaic: M,
        norm: Normalizer<T>,
        roles: BlockRoles,
    ) -> Self {
        Self {
            samples,
            width,
            height,
            mosaic,
            norm,
            roles,
            table: StencilTable::new(),
        }
    }

    /// `[r, g, b]` for the four positions of the block at `(x, y)`, in
    /// tl, tr, bl, br order.
    #[inline(always)]
    fn block(&self, x: usize, y: usize) -> [[f32; 3]; 4] {
        let (x1, y1) = (x + 1, y + 1);
        let xgy = match self.roles.kind {
            BlockKind::Xggy => [
                [self.native(x, y), self.mean(x, y, Plus), self.mean(x, y, Cross)],
                [self.mean(x1, y, Horizontal), self.native(x1, y), self.mean(x1, y, Vertical)],
                [self.mean(x, y1, Vertical), self.native(x, y1), self.mean(x, y1, Horizontal)],
                [self.mean(x1, y1, Cross), self.mean(x1, y1, Plus), self.native(x1, y1)],
            ],
            BlockKind::Gxyg => [
                [self.mean(x, y, Horizontal), self.native(x, y), self.mean(x, y, Vertical)],
                [self.native(x1, y), self.mean(x1, y, Plus), self.mean(x1, y, Cross)],
                [self.mean(x, y1, Cross), self.mean(x, y1, Plus), self.native(x, y1)],
                [self.mean(x1, y1, Vertical), self.native(x1, y1), self.mean(x1, y1, Horizontal)],
            ],
        };
        xgy.map(|p| self.roles.to_rgb(p))
    }

    #[inline(always)]
    fn sample(&self, x: usize, y: usize) -> f64 {
        self.samples[self.mosaic.locate(x, y)].to_f64()
    }

    #[inline(always)]
    fn native(&self, x: usize, y: usize) -> f32 {
        self.norm.apply_value(self.sample(x, y))
    }

    /// Mean of the in-bounds neighbours of `(x, y)` under `stencil`.
    #[inline(always)]
    fn mean(&self, x: usize, y: usize, stencil: Stencil) -> f32 {
        let class = PixelClass::of(x, y, self.width, self.height);
        let taps = self.table.get(class, stencil);
        let sum: f64 = taps
            .offsets()
            .iter()
            .map(|&(dx, dy)| self.sample(x.wrapping_add_signed(dx), y.wrapping_add_signed(dy)))
            .sum();
        self.norm.apply_value(sum / taps.len() as f64)
    }
}

impl<T: Sample, M: Mosaic> BandKernel for Bilinear<'_, T, M> {
    /// `rows.start` must be even.
    fn run_band<S: RgbSink>(&self, rows: Range<usize>, sink: &mut S) {
        let w = self.width;
        for y in rows.clone().step_by(2) {
            let top = (y - rows.start) * w;
            let bottom = top + w;
            for x in (0..w).step_by(2) {
                let [tl, tr, bl, br] = self.block(x, y);
                sink.put(top + x, tl);
                sink.put(top + x + 1, tr);
                sink.put(bottom + x, bl);
                sink.put(bottom + x + 1, br);
            }
        }
    }
}
