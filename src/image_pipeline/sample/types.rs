//! Sample type descriptors

use std::fmt;

use crate::image_pipeline::common::error::{DecodeError, Result};

/// Native numeric encoding of one pixel sample (the FITS BITPIX).
///
/// All types are stored big-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    UInt8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl SampleType {
    /// Parses a BITPIX header value.
    pub fn from_bitpix(bitpix: i64) -> Result<Self> {
        match bitpix {
            8 => Ok(Self::UInt8),
            16 => Ok(Self::Int16),
            32 => Ok(Self::Int32),
            64 => Ok(Self::Int64),
            -32 => Ok(Self::Float32),
            -64 => Ok(Self::Float64),
            other => Err(DecodeError::InvalidMetadata(format!(
                "BITPIX {} is not a valid sample type",
                other
            ))),
        }
    }

    pub fn bitpix(self) -> i64 {
        match self {
            Self::UInt8 => 8,
            Self::Int16 => 16,
            Self::Int32 => 32,
            Self::Int64 => 64,
            Self::Float32 => -32,
            Self::Float64 => -64,
        }
    }

    /// Width of one sample on the wire.
    pub fn byte_width(self) -> usize {
        self.bitpix().unsigned_abs() as usize / 8
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        };
        write!(f, "{} (BITPIX {})", name, self.bitpix())
    }
}
