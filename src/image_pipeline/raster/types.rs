//! Pixel layout and decoded buffer types

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::{DecodeError, Result};
use crate::image_pipeline::raster::component::Component;

/// Channel count and alpha placement of an interleaved output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// One value per pixel. Colour sources are reduced to BT.709 luma.
    Mono,
    /// R, G, B.
    Rgb,
    /// Alpha slot first, then R, G, B.
    Argb,
    /// R, G, B, then alpha slot.
    Rgba,
}

/// Where the alpha slot sits inside a 4-component pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaPosition {
    First,
    Last,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Rgb => 3,
            Self::Argb | Self::Rgba => 4,
        }
    }

    pub fn alpha(self) -> Option<AlphaPosition> {
        match self {
            Self::Mono | Self::Rgb => None,
            Self::Argb => Some(AlphaPosition::First),
            Self::Rgba => Some(AlphaPosition::Last),
        }
    }

    /// Offsets of the red, green and blue components within one pixel.
    /// `None` for [`PixelLayout::Mono`].
    pub fn color_offsets(self) -> Option<[usize; 3]> {
        match self {
            Self::Mono => None,
            Self::Rgb | Self::Rgba => Some([0, 1, 2]),
            Self::Argb => Some([1, 2, 3]),
        }
    }

    /// Offset of the alpha slot within one pixel.
    pub fn alpha_offset(self) -> Option<usize> {
        match self.alpha()? {
            AlphaPosition::First => Some(0),
            AlphaPosition::Last => Some(3),
        }
    }

    /// Layout for a plain channel count (1 ⇒ Mono, 3 ⇒ RGB, 4 ⇒ RGBA).
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(Self::Mono),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            other => Err(DecodeError::UnsupportedLayout(format!(
                "no pixel layout with {} channels",
                other
            ))),
        }
    }
}

impl FromStr for PixelLayout {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mono" | "gray" | "grey" => Ok(Self::Mono),
            "rgb" => Ok(Self::Rgb),
            "argb" => Ok(Self::Argb),
            "rgba" => Ok(Self::Rgba),
            _ => Err(DecodeError::UnsupportedLayout(s.to_string())),
        }
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mono => "Mono",
            Self::Rgb => "RGB",
            Self::Argb => "ARGB",
            Self::Rgba => "RGBA",
        };
        f.write_str(name)
    }
}

/// Byte order of serialized component data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    /// Byte order of in-memory buffers on this target.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }
}

/// Everything a renderer needs to interpret a decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub layout: PixelLayout,
    pub bits_per_component: u32,
    pub bits_per_pixel: u32,
    pub float_components: bool,
    pub byte_order: ByteOrder,
}

/// Interleaved decoded image.
#[derive(Debug, Clone)]
pub struct DecodedImage<C = f32> {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    pub layout: PixelLayout,
    /// `width * height * layout.channels()` components, row-major
    pub data: Vec<C>,
}

impl<C: Component> DecodedImage<C> {
    /// Allocates a zeroed buffer for `layout`.
    pub fn new(width: usize, height: usize, layout: PixelLayout) -> Self {
        Self {
            width,
            height,
            layout,
            data: vec![C::default(); width * height * layout.channels()],
        }
    }

    pub fn format(&self) -> PixelFormat {
        PixelFormat {
            layout: self.layout,
            bits_per_component: C::BITS,
            bits_per_pixel: C::BITS * self.layout.channels() as u32,
            float_components: C::IS_FLOAT,
            byte_order: ByteOrder::native(),
        }
    }

    /// Components of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[C] {
        let channels = self.layout.channels();
        let start = (y * self.width + x) * channels;
        &self.data[start..start + channels]
    }

    pub fn row_stride(&self) -> usize {
        self.width * self.layout.channels()
    }

    /// Serializes the buffer component by component in `order`.
    pub fn to_bytes(&self, order: ByteOrder) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * (C::BITS as usize / 8));
        match order {
            ByteOrder::Big => self.data.iter().for_each(|c| c.write_be(&mut out)),
            ByteOrder::Little => self.data.iter().for_each(|c| c.write_le(&mut out)),
        }
        out
    }

    pub fn into_raw(self) -> Vec<C> {
        self.data
    }
}

/// Three separate same-sized colour planes.
#[derive(Debug, Clone)]
pub struct PlanarImage<C = f32> {
    pub width: usize,
    pub height: usize,
    pub red: Vec<C>,
    pub green: Vec<C>,
    pub blue: Vec<C>,
}

impl<C: Component> PlanarImage<C> {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            red: vec![C::default(); size],
            green: vec![C::default(); size],
            blue: vec![C::default(); size],
        }
    }

    /// `[r, g, b]` at `(x, y)`.
    pub fn rgb(&self, x: usize, y: usize) -> [C; 3] {
        let i = y * self.width + x;
        [self.red[i], self.green[i], self.blue[i]]
    }

    pub fn planes_mut(&mut self) -> (&mut [C], &mut [C], &mut [C]) {
        (&mut self.red, &mut self.green, &mut self.blue)
    }

    pub fn bits_per_component(&self) -> u32 {
        C::BITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_channels_and_offsets() {
        assert_eq!(PixelLayout::Mono.channels(), 1);
        assert_eq!(PixelLayout::Rgb.channels(), 3);
        assert_eq!(PixelLayout::Argb.channels(), 4);
        assert_eq!(PixelLayout::Rgba.channels(), 4);

        assert_eq!(PixelLayout::Rgb.color_offsets(), Some([0, 1, 2]));
        assert_eq!(PixelLayout::Argb.color_offsets(), Some([1, 2, 3]));
        assert_eq!(PixelLayout::Rgba.color_offsets(), Some([0, 1, 2]));
        assert_eq!(PixelLayout::Mono.color_offsets(), None);

        assert_eq!(PixelLayout::Argb.alpha_offset(), Some(0));
        assert_eq!(PixelLayout::Rgba.alpha_offset(), Some(3));
        assert_eq!(PixelLayout::Rgb.alpha_offset(), None);
    }

    #[test]
    fn test_layout_parsing() {
        assert_eq!("ARGB".parse::<PixelLayout>().unwrap(), PixelLayout::Argb);
        assert_eq!(" rgba ".parse::<PixelLayout>().unwrap(), PixelLayout::Rgba);
        assert_eq!("gray".parse::<PixelLayout>().unwrap(), PixelLayout::Mono);
        assert!(matches!(
            "bgrx".parse::<PixelLayout>(),
            Err(DecodeError::UnsupportedLayout(_))
        ));
        assert!(matches!(
            PixelLayout::from_channels(2),
            Err(DecodeError::UnsupportedLayout(_))
        ));
    }

    #[test]
    fn test_format_metadata() {
        let image = DecodedImage::<u16>::new(4, 2, PixelLayout::Argb);
        let format = image.format();
        assert_eq!(format.bits_per_component, 16);
        assert_eq!(format.bits_per_pixel, 64);
        assert!(!format.float_components);
        assert_eq!(image.data.len(), 4 * 2 * 4);
        assert_eq!(image.row_stride(), 16);

        let image = DecodedImage::<f32>::new(3, 3, PixelLayout::Mono);
        assert!(image.format().float_components);
        assert_eq!(image.format().bits_per_pixel, 32);
    }

    #[test]
    fn test_to_bytes() {
        let mut image = DecodedImage::<u16>::new(1, 1, PixelLayout::Rgb);
        image.data.copy_from_slice(&[0x0102, 0x0304, 0x0506]);
        assert_eq!(image.to_bytes(ByteOrder::Big), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(image.to_bytes(ByteOrder::Little), vec![2, 1, 4, 3, 6, 5]);
    }

    #[test]
    fn test_pixel_access() {
        let mut image = DecodedImage::<f32>::new(2, 2, PixelLayout::Rgb);
        image.data[9..12].copy_from_slice(&[0.1, 0.2, 0.3]);
        assert_eq!(image.pixel(1, 1), &[0.1, 0.2, 0.3]);
    }
}
