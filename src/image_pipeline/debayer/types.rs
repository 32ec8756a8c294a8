//! Types for debayering operations

use crate::image_pipeline::common::error::{DecodeError, Result};

/// Colour channel of a CFA site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
}

/// Colour filter arrangement, read from the top-left corner of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfaPattern {
    /// R G / G B
    Rggb,
    /// B G / G R
    Bggr,
    /// G R / B G
    Grbg,
    /// G B / R G
    Gbrg,
    /// Cyan/yellow/green/magenta sensors. Recognized but not demosaiced.
    Cygm,
    /// Fujifilm 6x6 X-Trans. Recognized but not demosaiced.
    XTrans,
}

impl CfaPattern {
    /// Parses a BAYERPAT header value such as `'RGGB'`.
    ///
    /// Case-insensitive; surrounding whitespace and FITS string quotes are
    /// ignored.
    pub fn from_bayerpat(value: &str) -> Option<Self> {
        let value = value.trim().trim_matches('\'').trim().to_ascii_uppercase();
        match value.as_str() {
            "RGGB" => Some(Self::Rggb),
            "BGGR" => Some(Self::Bggr),
            "GRBG" => Some(Self::Grbg),
            "GBRG" => Some(Self::Gbrg),
            "CYGM" => Some(Self::Cygm),
            "XTRANS" | "X-TRANS" => Some(Self::XTrans),
            _ => None,
        }
    }

    pub fn is_implemented(self) -> bool {
        matches!(self, Self::Rggb | Self::Bggr | Self::Grbg | Self::Gbrg)
    }

    /// Colour sampled at `(x, y)`, or `None` for patterns without a 2x2 RGB
    /// period.
    pub fn color_at(self, x: usize, y: usize) -> Option<Color> {
        use Color::*;
        let site = ((y & 1) << 1) | (x & 1);
        let tile = match self {
            Self::Rggb => [Red, Green, Green, Blue],
            Self::Bggr => [Blue, Green, Green, Red],
            Self::Grbg => [Green, Red, Blue, Green],
            Self::Gbrg => [Green, Blue, Red, Green],
            Self::Cygm | Self::XTrans => return None,
        };
        Some(tile[site])
    }

    /// How this pattern maps onto the two canonical block shapes.
    pub(crate) fn roles(self) -> Result<BlockRoles> {
        match self {
            Self::Rggb => Ok(BlockRoles::new(BlockKind::Xggy, false)),
            Self::Bggr => Ok(BlockRoles::new(BlockKind::Xggy, true)),
            Self::Grbg => Ok(BlockRoles::new(BlockKind::Gxyg, false)),
            Self::Gbrg => Ok(BlockRoles::new(BlockKind::Gxyg, true)),
            Self::Cygm | Self::XTrans => Err(DecodeError::UnsupportedPattern(self)),
        }
    }
}

/// Storage order of the mosaic samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MosaicLayout {
    /// One CFA site per sample, row-major.
    #[default]
    Standard,
    /// Binned quad-Bayer: each 8-wide run of a row stores the four samples
    /// of its first colour, then the four samples of its second colour.
    Quad,
}

impl MosaicLayout {
    /// Horizontal period the width must be a multiple of.
    pub fn period_x(self) -> usize {
        match self {
            Self::Standard => 2,
            Self::Quad => 8,
        }
    }

    /// Vertical period the height must be a multiple of.
    pub fn period_y(self) -> usize {
        2
    }
}

/// The two canonical 2x2 blocks. `X` and `Y` are red/blue in some order.
///
/// ```text
/// Xggy:  X G     Gxyg:  G X
///        G Y            Y G
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Xggy,
    Gxyg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockRoles {
    pub kind: BlockKind,
    /// `true` when X is blue and Y is red.
    pub swap: bool,
}

impl BlockRoles {
    fn new(kind: BlockKind, swap: bool) -> Self {
        Self { kind, swap }
    }

    /// Reorders an `[x, g, y]` estimate into `[r, g, b]`.
    #[inline(always)]
    pub fn to_rgb(self, [x, g, y]: [f32; 3]) -> [f32; 3] {
        if self.swap { [y, g, x] } else { [x, g, y] }
    }
}
