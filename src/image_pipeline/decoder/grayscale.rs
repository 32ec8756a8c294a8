use tracing::debug;

use crate::image_pipeline::common::error::{DecodeError, Result};
use crate::image_pipeline::raster::sink::check_output;
use crate::image_pipeline::raster::{Component, DecodedImage, PixelLayout};
use crate::image_pipeline::sample::{Normalizer, PlaneView, Sample};

/// Elementwise normalization of a single-layer frame into a Mono buffer.
///
/// Runs inline on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayscaleDecoder;

impl GrayscaleDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode_into<T: Sample, C: Component>(
        &self,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
        out: &mut [C],
    ) -> Result<()> {
        if view.layers() != 1 {
            return Err(DecodeError::UnsupportedFormat(format!(
                "grayscale decoding needs one layer, got {}",
                view.layers()
            )));
        }
        check_output(out.len(), view.pixels())?;

        debug!(width = view.width(), height = view.height(), "Decoding grayscale frame");
        for (dst, &sample) in out.iter_mut().zip(view.samples()) {
            *dst = C::from_unit(norm.apply(sample));
        }
        Ok(())
    }

    pub fn decode<T: Sample, C: Component>(
        &self,
        view: PlaneView<'_, T>,
        norm: &Normalizer<T>,
    ) -> Result<DecodedImage<C>> {
        let mut image = DecodedImage::new(view.width(), view.height(), PixelLayout::Mono);
        self.decode_into(view, norm, &mut image.data)?;
        Ok(image)
    }
}
