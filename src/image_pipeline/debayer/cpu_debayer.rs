use std::ops::Range;

use tracing::{debug, info};

use crate::image_pipeline::common::error::{DecodeError, Result};
use crate::image_pipeline::debayer::bilinear::Bilinear;
use crate::image_pipeline::debayer::mosaic::{QuadMosaic, StandardMosaic};
use crate::image_pipeline::debayer::split::CfaSplit;
use crate::image_pipeline::debayer::types::{BlockRoles, CfaPattern, MosaicLayout};
use crate::image_pipeline::parallel::{planar_work, split_rows_mut, WorkerPool};
use crate::image_pipeline::raster::sink::{check_output, run_bands, InterleavedSink, PlanarSink, RgbSink};
use crate::image_pipeline::raster::{Component, DecodedImage, PixelLayout, PlanarImage};
use crate::image_pipeline::sample::{Normalizer, PlaneView, Sample};

/// Portable bilinear demosaic for the four 2x2 Bayer patterns.
///
/// Work is split into row bands that start on even rows and run on the
/// given [`WorkerPool`]. Every band reads the whole mosaic and writes only
/// its own rows, so the result does not depend on the thread count.
#[derive(Debug, Clone, Copy)]
pub struct CpuDebayer {
    pattern: CfaPattern,
    mosaic: MosaicLayout,
    roles: BlockRoles,
}

impl CpuDebayer {
    /// Fails with [`DecodeError::UnsupportedPattern`] for patterns that are
    /// recognized but not implemented.
    pub fn new(pattern: CfaPattern, mosaic: MosaicLayout) -> Result<Self> {
        Ok(Self {
            pattern,
            mosaic,
            roles: pattern.roles()?,
        })
    }

    pub fn pattern(&self) -> CfaPattern {
        self.pattern
    }

    pub fn mosaic(&self) -> MosaicLayout {
        self.mosaic
    }

    /// Width and height must be even, at least 2, and the width a multiple
    /// of the storage period (8 for quad-Bayer).
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        if width < 2 || height < 2 || width % 2 != 0 || height % 2 != 0 {
            return Err(DecodeError::UnsupportedFormat(format!(
                "{:?} mosaic needs even dimensions of at least 2x2, got {}x{}",
                self.pattern, width, height
            )));
        }
        let period = self.mosaic.period_x();
        if width % period != 0 {
            return Err(DecodeError::UnsupportedFormat(format!(
                "{:?} storage needs a width divisible by {}, got {}",
                self.mosaic, period, width
            )));
        }
        Ok(())
    }

    fn check_view<T: Sample>(&self, view: &PlaneView<'_, T>) -> Result<()> {
        if view.layers() != 1 {
            return Err(DecodeError::UnsupportedFormat(format!(
                "a mosaic has one layer, got {}",
                view.layers()
            )));
        }
        self.validate(view.width(), view.height())
    }

    /// Demosaics into an interleaved buffer of `width * height *
    /// layout.channels()` components. Alpha slots are set to `alpha`;
    /// [`PixelLayout::Mono`] receives BT.709 luma.
    pub fn demosaic_into<T: Sample, C: Component>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
        layout: PixelLayout,
        alpha: f32,
        out: &mut [C],
    ) -> Result<()> {
        self.check_view(&view)?;
        let row_len = view.width() * layout.channels();
        check_output(out.len(), row_len * view.height())?;

        info!(
            "Demosaicing {}x{} {:?} mosaic into {}",
            view.width(), view.height(), self.pattern, layout
        );

        let bands = pool.bands(view.height(), 2);
        let slices = split_rows_mut(out, &bands, row_len);
        let work: Vec<_> = bands.into_iter().zip(slices).collect();
        self.interpolate(pool, view, norm, work, |out| InterleavedSink::new(out, layout, alpha));
        Ok(())
    }

    /// Demosaics into three separate `width * height` planes.
    pub fn demosaic_planes_into<T: Sample, C: Component>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
        red: &mut [C],
        green: &mut [C],
        blue: &mut [C],
    ) -> Result<()> {
        self.check_view(&view)?;
        let size = view.pixels();
        for plane in [&*red, &*green, &*blue] {
            check_output(plane.len(), size)?;
        }

        info!(
            "Demosaicing {}x{} {:?} mosaic into planes",
            view.width(), view.height(), self.pattern
        );

        let work = planar_work(pool, view.width(), view.height(), 2, red, green, blue);
        self.interpolate(pool, view, norm, work, |(r, g, b)| PlanarSink::new(r, g, b));
        Ok(())
    }

    /// Allocating form of [`CpuDebayer::demosaic_into`].
    pub fn process<T: Sample, C: Component>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
        layout: PixelLayout,
        alpha: f32,
    ) -> Result<DecodedImage<C>> {
        let mut image = DecodedImage::new(view.width(), view.height(), layout);
        self.demosaic_into(pool, view, norm, layout, alpha, &mut image.data)?;
        Ok(image)
    }

    /// Allocating form of [`CpuDebayer::demosaic_planes_into`].
    pub fn process_planar<T: Sample, C: Component>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
    ) -> Result<PlanarImage<C>> {
        let mut image = PlanarImage::new(view.width(), view.height());
        let (red, green, blue) = image.planes_mut();
        self.demosaic_planes_into(pool, view, norm, red, green, blue)?;
        Ok(image)
    }

    /// Spreads the mosaic over three sparse planes without interpolating.
    pub fn split_planes<T: Sample, C: Component>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
    ) -> Result<PlanarImage<C>> {
        self.check_view(&view)?;
        debug!(width = view.width(), height = view.height(), "Splitting CFA planes");

        let mut image = PlanarImage::new(view.width(), view.height());
        let (red, green, blue) = image.planes_mut();
        let work = planar_work(pool, view.width(), view.height(), 1, red, green, blue);

        let (w, n) = (view.width(), *norm);
        let unsupported = || DecodeError::UnsupportedPattern(self.pattern);
        match self.mosaic {
            MosaicLayout::Standard => {
                let split = CfaSplit::new(view.samples(), w, StandardMosaic::new(w), n, self.pattern)
                    .ok_or_else(unsupported)?;
                run_bands(pool, &split, work, |(r, g, b)| PlanarSink::new(r, g, b));
            }
            MosaicLayout::Quad => {
                let split = CfaSplit::new(view.samples(), w, QuadMosaic::new(w), n, self.pattern)
                    .ok_or_else(unsupported)?;
                run_bands(pool, &split, work, |(r, g, b)| PlanarSink::new(r, g, b));
            }
        }
        Ok(image)
    }

    fn interpolate<T, W, S, F>(
        &self,
        pool: &WorkerPool,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
        work: Vec<(Range<usize>, W)>,
        sink: F,
    ) where
        T: Sample,
        W: Send,
        S: RgbSink,
        F: Fn(W) -> S + Sync,
    {
        let (w, h) = (view.width(), view.height());
        match self.mosaic {
            MosaicLayout::Standard => {
                let kernel = Bilinear::new(view.samples(), w, h, StandardMosaic::new(w), *norm, self.roles);
                run_bands(pool, &kernel, work, sink);
            }
            MosaicLayout::Quad => {
                let kernel = Bilinear::new(view.samples(), w, h, QuadMosaic::new(w), *norm, self.roles);
                run_bands(pool, &kernel, work, sink);
            }
        }
        debug!(bands = pool.threads(), "Demosaic bands finished");
    }
}
