use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{DecodeError, Result},
    conversions::types::{DecodeConfig, DecodedFrame, ImageMetadata, OutputShape, SampleRange},
    debayer::CpuDebayer,
    decoder::{GrayscaleDecoder, PlanarDecoder},
    parallel::WorkerPool,
    raster::Component,
    sample::{Normalizer, PlaneView, RawPlane, Sample, SampleType},
};

/// Decoder chosen for a frame from its metadata.
#[derive(Debug, Clone, Copy)]
enum Route {
    Grayscale,
    Planar,
    Demosaic(CpuDebayer),
}

/// Turns a raw big-endian data unit into a normalized raster.
///
/// The decoder is picked from the metadata: a CFA pattern selects the
/// demosaic engine, three layers the planar decoder and one layer the
/// grayscale decoder. The worker pool is created once and reused for every
/// call.
#[derive(Debug)]
pub struct RasterPipeline {
    config: DecodeConfig,
    pool: WorkerPool,
}

impl RasterPipeline {
    pub fn new(config: DecodeConfig) -> Result<Self> {
        let pool = WorkerPool::new(config.threads)?;
        Ok(Self { config, pool })
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                return Err(DecodeError::InvalidMetadata(format!(
                    "{}x{} exceeds the maximum dimension {}",
                    width, height, max
                )));
            }
        }

        Ok(())
    }

    fn route(&self, metadata: &ImageMetadata) -> Result<Route> {
        if let Some(pattern) = metadata.cfa {
            if metadata.channels != 1 {
                return Err(DecodeError::UnsupportedFormat(format!(
                    "a {:?} mosaic must have one layer, got {}",
                    pattern, metadata.channels
                )));
            }
            let debayer = CpuDebayer::new(pattern, metadata.mosaic)?;
            debayer.validate(metadata.width, metadata.height)?;
            return Ok(Route::Demosaic(debayer));
        }

        if self.config.shape == OutputShape::CfaSplit {
            return Err(DecodeError::UnsupportedFormat(
                "CFA split requested for a frame without a CFA pattern".to_string(),
            ));
        }

        match metadata.channels {
            1 => Ok(Route::Grayscale),
            3 => Ok(Route::Planar),
            other => Err(DecodeError::UnsupportedFormat(format!(
                "{} layers without a CFA pattern",
                other
            ))),
        }
    }

    /// Decodes into `f32` components.
    pub fn decode(&self, metadata: &ImageMetadata, bytes: &[u8]) -> Result<DecodedFrame<f32>> {
        self.decode_as(metadata, bytes)
    }

    /// Decodes into components of type `C`.
    #[instrument(skip(self, metadata, bytes), fields(
        width = metadata.width,
        height = metadata.height,
        channels = metadata.channels,
        sample_type = %metadata.sample_type,
        input_size = bytes.len()
    ))]
    pub fn decode_as<C: Component>(&self, metadata: &ImageMetadata, bytes: &[u8]) -> Result<DecodedFrame<C>> {
        info!("Starting raster decode");

        let route = {
            let _span = tracing::info_span!("validate").entered();
            metadata.validate()?;
            self.validate_dimensions(metadata.width, metadata.height)?;
            self.route(metadata)?
        };

        let frame = match metadata.sample_type {
            SampleType::UInt8 => self.decode_typed::<u8, C>(metadata, route, bytes),
            SampleType::Int16 => self.decode_typed::<i16, C>(metadata, route, bytes),
            SampleType::Int32 => self.decode_typed::<i32, C>(metadata, route, bytes),
            SampleType::Int64 => self.decode_typed::<i64, C>(metadata, route, bytes),
            SampleType::Float32 => self.decode_typed::<f32, C>(metadata, route, bytes),
            SampleType::Float64 => self.decode_typed::<f64, C>(metadata, route, bytes),
        }?;

        info!(
            width = frame.width(),
            height = frame.height(),
            bits = frame.bits_per_component(),
            "Decode complete"
        );
        Ok(frame)
    }

    fn decode_typed<T: Sample, C: Component>(
        &self,
        metadata: &ImageMetadata,
        route: Route,
        bytes: &[u8],
    ) -> Result<DecodedFrame<C>> {
        let plane = {
            let _span = tracing::info_span!("cast", sample_type = %T::TYPE).entered();
            RawPlane::<T>::from_be_bytes(
                &self.pool,
                bytes,
                metadata.width,
                metadata.height,
                metadata.channels,
            )?
        };
        let norm = self.normalizer(metadata, plane.samples())?;

        let _span = tracing::info_span!("decode", route = ?route).entered();
        self.run(route, plane.view(), &norm)
    }

    /// Decodes samples that are already typed and in native byte order.
    pub fn decode_samples<T: Sample, C: Component>(
        &self,
        metadata: &ImageMetadata,
        samples: &[T],
    ) -> Result<DecodedFrame<C>> {
        if metadata.sample_type != T::TYPE {
            return Err(DecodeError::InvalidMetadata(format!(
                "metadata declares {}, samples are {}",
                metadata.sample_type,
                T::TYPE
            )));
        }
        metadata.validate()?;
        self.validate_dimensions(metadata.width, metadata.height)?;
        let route = self.route(metadata)?;

        let view = PlaneView::new(samples, metadata.width, metadata.height, metadata.channels)?;
        let norm = self.normalizer(metadata, view.samples())?;
        self.run(route, view, &norm)
    }

    fn normalizer<T: Sample>(
        &self,
        metadata: &ImageMetadata,
        samples: &[T],
    ) -> Result<Normalizer<T>> {
        match self.config.range {
            SampleRange::Native => Normalizer::native(metadata.zero, metadata.scale),
            SampleRange::Data => Normalizer::from_data(metadata.zero, metadata.scale, samples),
        }
    }

    fn run<T: Sample, C: Component>(
        &self,
        route: Route,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
    ) -> Result<DecodedFrame<C>> {
        let config = &self.config;
        match (route, config.shape) {
            (Route::Grayscale, shape) => {
                if shape == OutputShape::Planar {
                    warn!("Planar output requested for a grayscale frame, producing Mono");
                }
                GrayscaleDecoder::new()
                    .decode(view, norm)
                    .map(DecodedFrame::Interleaved)
            }
            (Route::Planar, OutputShape::Planar) => PlanarDecoder::new(config.layout, config.alpha)
                .decode_planes(&self.pool, view, norm)
                .map(DecodedFrame::Planar),
            (Route::Planar, _) => PlanarDecoder::new(config.layout, config.alpha)
                .decode(&self.pool, view, norm)
                .map(DecodedFrame::Interleaved),
            (Route::Demosaic(debayer), OutputShape::Interleaved) => debayer
                .process(&self.pool, view, norm, config.layout, config.alpha)
                .map(DecodedFrame::Interleaved),
            (Route::Demosaic(debayer), OutputShape::Planar) => debayer
                .process_planar(&self.pool, view, norm)
                .map(DecodedFrame::Planar),
            (Route::Demosaic(debayer), OutputShape::CfaSplit) => debayer
                .split_planes(&self.pool, view, norm)
                .map(DecodedFrame::Planar),
        }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }
}
