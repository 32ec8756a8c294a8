//! Logical-to-storage addressing of mosaic samples.
//!
//! The interpolation always works in logical CFA space, where the colour of
//! `(x, y)` follows the 2x2 pattern. A [`Mosaic`] translates a logical
//! position into the index of the sample that holds it.

use crate::image_pipeline::debayer::types::MosaicLayout;

pub(crate) trait Mosaic: Copy + Send + Sync {
    fn locate(&self, x: usize, y: usize) -> usize;
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StandardMosaic {
    width: usize,
}

impl StandardMosaic {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl Mosaic for StandardMosaic {
    #[inline(always)]
    fn locate(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

/// Binned quad-Bayer storage. Width must be a multiple of 8.
///
/// Within each 8-sample run the logical even columns are stored first and
/// the odd columns after them, so same-coloured neighbours sit four
/// samples apart in storage instead of two.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QuadMosaic {
    width: usize,
}

impl QuadMosaic {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    #[inline(always)]
    pub fn column(x: usize) -> usize {
        let run = x & !7;
        let within = x & 7;
        run + (within >> 1) + if within & 1 == 1 { 4 } else { 0 }
    }
}

impl Mosaic for QuadMosaic {
    #[inline(always)]
    fn locate(&self, x: usize, y: usize) -> usize {
        y * self.width + Self::column(x)
    }
}

/// Reorders logical row-major samples into `layout` storage order.
pub fn to_storage_order<T: Copy>(logical: &[T], width: usize, layout: MosaicLayout) -> Vec<T> {
    match layout {
        MosaicLayout::Standard => logical.to_vec(),
        MosaicLayout::Quad => {
            let mut stored = logical.to_vec();
            for (src, dst) in logical.chunks_exact(width).zip(stored.chunks_exact_mut(width)) {
                for (x, &v) in src.iter().enumerate() {
                    dst[QuadMosaic::column(x)] = v;
                }
            }
            stored
        }
    }
}
