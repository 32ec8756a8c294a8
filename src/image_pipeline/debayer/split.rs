//! Colour-coded CFA split: the mosaic spread over three sparse planes.
//!
//! Every pixel keeps only its natively sampled value, in the plane of its
//! own colour. The other two planes read zero at that position.

use std::ops::Range;

use crate::image_pipeline::debayer::mosaic::Mosaic;
use crate::image_pipeline::debayer::types::{CfaPattern, Color};
use crate::image_pipeline::raster::sink::{BandKernel, RgbSink};
use crate::image_pipeline::sample::{Normalizer, Sample};

pub(crate) struct CfaSplit<'a, T, M> {
    samples: &'a [T],
    width: usize,
    mosaic: M,
    norm: Normalizer<T>,
    tile: [Color; 4],
}

impl<'a, T: Sample, M: Mosaic> CfaSplit<'a, T, M> {
    /// Returns `None` for patterns without a 2x2 RGB tile.
    pub fn new(
        samples: &'a [T],
        width: usize,
        mosaic: M,
        norm: Normalizer<T>,
        pattern: CfaPattern,
    ) -> Option<Self> {
        let tile = [
            pattern.color_at(0, 0)?,
            pattern.color_at(1, 0)?,
            pattern.color_at(0, 1)?,
            pattern.color_at(1, 1)?,
        ];
        Some(Self {
            samples,
            width,
            mosaic,
            norm,
            tile,
        })
    }
}

impl<T: Sample, M: Mosaic> BandKernel for CfaSplit<'_, T, M> {
    fn run_band<S: RgbSink>(&self, rows: Range<usize>, sink: &mut S) {
        for y in rows.clone() {
            let row = (y - rows.start) * self.width;
            for x in 0..self.width {
                let value = self.norm.apply(self.samples[self.mosaic.locate(x, y)]);
                let rgb = match self.tile[((y & 1) << 1) | (x & 1)] {
                    Color::Red => [value, 0.0, 0.0],
                    Color::Green => [0.0, value, 0.0],
                    Color::Blue => [0.0, 0.0, value],
                };
                sink.put(row + x, rgb);
            }
        }
    }
}
