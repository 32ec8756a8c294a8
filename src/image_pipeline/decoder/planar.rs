use std::ops::Range;

use tracing::info;

use crate::image_pipeline::common::error::{DecodeError, Result};
use crate::image_pipeline::parallel::{planar_work, split_rows_mut, WorkerPool};
use crate::image_pipeline::raster::sink::{
    check_output, run_bands, BandKernel, InterleavedSink, PlanarSink, RgbSink,
};
use crate::image_pipeline::raster::{Component, DecodedImage, PixelLayout, PlanarImage};
use crate::image_pipeline::sample::{Normalizer, PlaneView, Sample};

/// Interleaves three colour layers (R, G, B in storage order).
///
/// Rows are split into bands across the pool. Alpha slots receive `alpha`
/// and [`PixelLayout::Mono`] receives BT.709 luma.
#[derive(Debug, Clone, Copy)]
pub struct PlanarDecoder {
    layout: PixelLayout,
    alpha: f32,
}

impl PlanarDecoder {
    pub fn new(layout: PixelLayout, alpha: f32) -> Self {
        Self { layout, alpha }
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn decode_into<T: Sample, C: Component>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
        out: &mut [C],
    ) -> Result<()> {
        let kernel = Layers::new(view, *norm)?;
        let row_len = view.width() * self.layout.channels();
        check_output(out.len(), row_len * view.height())?;

        info!("Interleaving {}x{} planes into {}", view.width(), view.height(), self.layout);

        let bands = pool.bands(view.height(), 1);
        let slices = split_rows_mut(out, &bands, row_len);
        let work: Vec<_> = bands.into_iter().zip(slices).collect();
        let (layout, alpha) = (self.layout, self.alpha);
        run_bands(pool, &kernel, work, |out| InterleavedSink::new(out, layout, alpha));
        Ok(())
    }

    pub fn decode<T: Sample, C: Component>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
    ) -> Result<DecodedImage<C>> {
        let mut image = DecodedImage::new(view.width(), view.height(), self.layout);
        self.decode_into(pool, view, norm, &mut image.data)?;
        Ok(image)
    }

    /// Normalizes the three layers into separate planes without
    /// interleaving. The configured layout is ignored.
    pub fn decode_planes<T: Sample, C: Component>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
    ) -> Result<PlanarImage<C>> {
        let kernel = Layers::new(view, *norm)?;
        info!("Normalizing {}x{} planes", view.width(), view.height());

        let mut image = PlanarImage::new(view.width(), view.height());
        let (red, green, blue) = image.planes_mut();
        let work = planar_work(pool, view.width(), view.height(), 1, red, green, blue);
        run_bands(pool, &kernel, work, |(r, g, b)| PlanarSink::new(r, g, b));
        Ok(image)
    }
}

struct Layers<'a, T> {
    red: &'a [T],
    green: &'a [T],
    blue: &'a [T],
    width: usize,
    norm: Normalizer<T>,
}

impl<'a, T: Sample> Layers<'a, T> {
    fn new(view: PlaneView<'a, T>, norm: Normalizer<T>) -> Result<Self> {
        match (view.layers(), view.layer(0), view.layer(1), view.layer(2)) {
            (3, Some(red), Some(green), Some(blue)) => Ok(Self {
                red,
                green,
                blue,
                width: view.width(),
                norm,
            }),
            (layers, ..) => Err(DecodeError::UnsupportedFormat(format!(
                "planar colour decoding needs three layers, got {}",
                layers
            ))),
        }
    }
}

impl<T: Sample> BandKernel for Layers<'_, T> {
    fn run_band<S: RgbSink>(&self, rows: Range<usize>, sink: &mut S) {
        let first = rows.start * self.width;
        let pixels = rows.len() * self.width;
        for local in 0..pixels {
            let i = first + local;
            let rgb = [
                self.norm.apply(self.red[i]),
                self.norm.apply(self.green[i]),
                self.norm.apply(self.blue[i]),
            ];
            sink.put(local, rgb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers(red: u8, green: u8, blue: u8, pixels: usize) -> Vec<u8> {
        let mut samples = vec![red; pixels];
        samples.extend(std::iter::repeat_n(green, pixels));
        samples.extend(std::iter::repeat_n(blue, pixels));
        samples
    }

    fn u8_norm() -> Normalizer<u8> {
        Normalizer::native(0.0, 1.0).unwrap()
    }

    #[test]
    fn test_white_luma_is_one() {
        let samples = layers(255, 255, 255, 6);
        let view = PlaneView::new(&samples, 3, 2, 3).unwrap();
        let image: DecodedImage<f32> = PlanarDecoder::new(PixelLayout::Mono, 1.0)
            .decode(&WorkerPool::inline(), view, &u8_norm())
            .unwrap();
        assert_eq!(image.data.len(), 6);
        for v in image.data {
            assert!((v - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_red_luma() {
        let samples = layers(255, 0, 0, 4);
        let view = PlaneView::new(&samples, 2, 2, 3).unwrap();
        let image: DecodedImage<f32> = PlanarDecoder::new(PixelLayout::Mono, 1.0)
            .decode(&WorkerPool::new(2).unwrap(), view, &u8_norm())
            .unwrap();
        for v in image.data {
            assert!((v - 0.2126).abs() < 1e-6);
        }
    }

    #[test]
    fn test_layout_offsets() {
        // Distinct values per pixel and layer.
        let samples: Vec<u8> = (0..12).map(|v| v * 20).collect();
        let view = PlaneView::new(&samples, 2, 2, 3).unwrap();
        let pool = WorkerPool::new(2).unwrap();
        let n = |v: u8| v as f32 / 255.0;

        let rgb: DecodedImage<f32> = PlanarDecoder::new(PixelLayout::Rgb, 1.0)
            .decode(&pool, view, &u8_norm())
            .unwrap();
        let argb: DecodedImage<f32> = PlanarDecoder::new(PixelLayout::Argb, 1.0)
            .decode(&pool, view, &u8_norm())
            .unwrap();
        let rgba: DecodedImage<f32> = PlanarDecoder::new(PixelLayout::Rgba, 0.0)
            .decode(&pool, view, &u8_norm())
            .unwrap();

        for i in 0..4 {
            let (x, y) = (i % 2, i / 2);
            let (r, g, b) = (n(samples[i]), n(samples[i + 4]), n(samples[i + 8]));
            let close = |got: &[f32], want: &[f32]| {
                got.iter().zip(want).all(|(a, b)| (a - b).abs() < 1e-6)
            };
            assert!(close(rgb.pixel(x, y), &[r, g, b]));
            assert!(close(argb.pixel(x, y), &[1.0, r, g, b]));
            assert!(close(rgba.pixel(x, y), &[r, g, b, 0.0]));
        }
    }

    #[test]
    fn test_threads_do_not_change_output() {
        let samples: Vec<i16> = (0..3 * 35).map(|v| (v * 611 % 4000) as i16 - 2000).collect();
        let view = PlaneView::new(&samples, 5, 7, 3).unwrap();
        let norm = Normalizer::<i16>::native(0.0, 1.0).unwrap();
        let decoder = PlanarDecoder::new(PixelLayout::Argb, 1.0);

        let single: DecodedImage<u16> = decoder.decode(&WorkerPool::inline(), view, &norm).unwrap();
        for threads in [2, 3, 8] {
            let multi: DecodedImage<u16> = decoder
                .decode(&WorkerPool::new(threads).unwrap(), view, &norm)
                .unwrap();
            assert_eq!(single.data, multi.data);
        }
    }

    #[test]
    fn test_decode_planes() {
        let samples = layers(0, 51, 255, 4);
        let view = PlaneView::new(&samples, 2, 2, 3).unwrap();
        let planes: PlanarImage<u8> = PlanarDecoder::new(PixelLayout::Argb, 1.0)
            .decode_planes(&WorkerPool::new(2).unwrap(), view, &u8_norm())
            .unwrap();
        assert_eq!(planes.red, vec![0; 4]);
        assert_eq!(planes.green, vec![51; 4]);
        assert_eq!(planes.blue, vec![255; 4]);
    }

    #[test]
    fn test_wrong_layer_count() {
        let samples = vec![0u8; 16];
        let view = PlaneView::new(&samples, 2, 2, 4).unwrap();
        let err = PlanarDecoder::new(PixelLayout::Rgb, 1.0)
            .decode::<u8, f32>(&WorkerPool::inline(), view, &u8_norm())
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }
}
