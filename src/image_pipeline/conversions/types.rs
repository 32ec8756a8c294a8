//! Decode metadata and configuration types

use crate::image_pipeline::common::error::{DecodeError, Result};
use crate::image_pipeline::debayer::{CfaPattern, MosaicLayout};
use crate::image_pipeline::parallel::DEFAULT_THREADS;
use crate::image_pipeline::raster::{Component, DecodedImage, PixelLayout, PlanarImage};
use crate::image_pipeline::sample::SampleType;

/// Everything the decoder needs to know about one data unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadata {
    pub width: usize,
    pub height: usize,
    /// Number of stored layers (NAXIS3, or 1 for a 2-D image)
    pub channels: usize,
    pub sample_type: SampleType,
    /// BSCALE
    pub scale: f64,
    /// BZERO
    pub zero: f64,
    /// Colour filter arrangement; `None` when the frame is not mosaiced
    pub cfa: Option<CfaPattern>,
    /// Storage order of a mosaiced frame
    pub mosaic: MosaicLayout,
}

impl ImageMetadata {
    /// Metadata with `scale = 1`, `zero = 0` and no CFA.
    pub fn new(width: usize, height: usize, channels: usize, sample_type: SampleType) -> Self {
        Self {
            width,
            height,
            channels,
            sample_type,
            scale: 1.0,
            zero: 0.0,
            cfa: None,
            mosaic: MosaicLayout::Standard,
        }
    }

    pub fn with_scaling(mut self, zero: f64, scale: f64) -> Self {
        self.zero = zero;
        self.scale = scale;
        self
    }

    pub fn with_cfa(mut self, pattern: CfaPattern) -> Self {
        self.cfa = Some(pattern);
        self
    }

    pub fn with_mosaic(mut self, mosaic: MosaicLayout) -> Self {
        self.mosaic = mosaic;
        self
    }

    /// Size of the data unit without padding.
    pub fn expected_bytes(&self) -> Result<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.channels))
            .and_then(|n| n.checked_mul(self.sample_type.byte_width()))
            .ok_or_else(|| DecodeError::InvalidMetadata("data unit size overflows".to_string()))
    }

    /// Checks that dimensions and scaling are usable at all.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DecodeError::InvalidMetadata(format!(
                "image dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.channels == 0 {
            return Err(DecodeError::InvalidMetadata("channel count is zero".to_string()));
        }
        if !self.scale.is_finite() || !self.zero.is_finite() {
            return Err(DecodeError::InvalidMetadata(format!(
                "scale {} and zero {} must be finite",
                self.scale, self.zero
            )));
        }
        self.expected_bytes().map(|_| ())
    }
}

/// Shape of the decoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputShape {
    /// One interleaved buffer in the configured [`PixelLayout`].
    #[default]
    Interleaved,
    /// Three separate R, G, B planes.
    Planar,
    /// Three sparse planes holding only the natively sampled values of a
    /// mosaic. Only valid for CFA frames.
    CfaSplit,
}

/// Bounds integer samples are normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleRange {
    /// The full range of the sample type.
    #[default]
    Native,
    /// The smallest and largest value present in the frame.
    Data,
}

/// Configuration for raster decoding
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Worker threads for the demosaic and planar decoders; 1 runs inline
    pub threads: usize,
    /// Interleaved layout for colour output
    pub layout: PixelLayout,
    pub shape: OutputShape,
    /// Value written into the alpha slot of ARGB/RGBA output
    pub alpha: f32,
    pub range: SampleRange,
    /// Whether to check width/height against `max_dimension` before decoding
    pub validate_dimensions: bool,
    pub max_dimension: Option<usize>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            layout: PixelLayout::Argb,
            shape: OutputShape::Interleaved,
            alpha: 1.0,
            range: SampleRange::Native,
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl DecodeConfig {
    pub fn builder() -> DecodeConfigBuilder {
        DecodeConfigBuilder::default()
    }
}

/// Builder for DecodeConfig
#[derive(Default)]
pub struct DecodeConfigBuilder {
    threads: Option<usize>,
    layout: Option<PixelLayout>,
    shape: Option<OutputShape>,
    alpha: Option<f32>,
    range: Option<SampleRange>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl DecodeConfigBuilder {
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn layout(mut self, layout: PixelLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn shape(mut self, shape: OutputShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn range(mut self, range: SampleRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> DecodeConfig {
        let default = DecodeConfig::default();
        DecodeConfig {
            threads: self.threads.unwrap_or(default.threads),
            layout: self.layout.unwrap_or(default.layout),
            shape: self.shape.unwrap_or(default.shape),
            alpha: self.alpha.unwrap_or(default.alpha),
            range: self.range.unwrap_or(default.range),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}

/// Result of one decode call.
#[derive(Debug, Clone)]
pub enum DecodedFrame<C = f32> {
    Interleaved(DecodedImage<C>),
    Planar(PlanarImage<C>),
}

impl<C: Component> DecodedFrame<C> {
    pub fn width(&self) -> usize {
        match self {
            Self::Interleaved(image) => image.width,
            Self::Planar(image) => image.width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Interleaved(image) => image.height,
            Self::Planar(image) => image.height,
        }
    }

    pub fn bits_per_component(&self) -> u32 {
        C::BITS
    }

    pub fn into_interleaved(self) -> Option<DecodedImage<C>> {
        match self {
            Self::Interleaved(image) => Some(image),
            Self::Planar(_) => None,
        }
    }

    pub fn into_planar(self) -> Option<PlanarImage<C>> {
        match self {
            Self::Planar(image) => Some(image),
            Self::Interleaved(_) => None,
        }
    }
}
