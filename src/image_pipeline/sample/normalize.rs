//! Normalization of raw samples onto `[0, 1]`.
//!
//! Integer samples are mapped affinely through their physical value
//! `zero + v * scale` relative to the physical values of the range bounds,
//! which reduces to `(v - min) / (max - min)`. Float samples are assumed to
//! be pre-scaled and pass through unchanged; zero and scale are ignored.

use std::marker::PhantomData;

use crate::image_pipeline::common::error::{DecodeError, Result};
use crate::image_pipeline::sample::types::SampleType;

/// A fixed-width numeric sample read from a big-endian data unit.
///
/// Implemented for `u8`, `i16`, `i32`, `i64`, `f32` and `f64`. Decoders are
/// generic over this trait so every per-pixel loop is monomorphized for the
/// concrete sample type.
pub trait Sample: Copy + PartialOrd + Send + Sync + 'static {
    const TYPE: SampleType;
    const IS_FLOAT: bool;
    const BYTES: usize;
    /// Lower bound of the native range.
    const MIN: Self;
    /// Upper bound of the native range.
    const MAX: Self;

    /// Reads one sample from exactly `Self::BYTES` big-endian bytes.
    fn from_be_slice(bytes: &[u8]) -> Self;

    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($ty:ty, $kind:expr, $is_float:expr, $min:expr, $max:expr) => {
        impl Sample for $ty {
            const TYPE: SampleType = $kind;
            const IS_FLOAT: bool = $is_float;
            const BYTES: usize = std::mem::size_of::<$ty>();
            const MIN: Self = $min;
            const MAX: Self = $max;

            #[inline(always)]
            fn from_be_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_be_bytes(raw)
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_sample!(u8, SampleType::UInt8, false, u8::MIN, u8::MAX);
impl_sample!(i16, SampleType::Int16, false, i16::MIN, i16::MAX);
impl_sample!(i32, SampleType::Int32, false, i32::MIN, i32::MAX);
impl_sample!(i64, SampleType::Int64, false, i64::MIN, i64::MAX);
// Floats are pre-scaled; their nominal range is [0, 1].
impl_sample!(f32, SampleType::Float32, true, 0.0, 1.0);
impl_sample!(f64, SampleType::Float64, true, 0.0, 1.0);

/// Precomputed normalization for one decode call.
///
/// The same zero/scale pair and range apply to every sample of the call.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<T> {
    zero: f64,
    scale: f64,
    floor: f64,
    range: f64,
    _sample: PhantomData<T>,
}

impl<T: Sample> Normalizer<T> {
    /// Builds a normalizer over `[min, max]`.
    ///
    /// Fails with [`DecodeError::DegenerateRange`] when the physical range
    /// collapses to zero (`min == max`, or `scale == 0`) for an integer type.
    pub fn new(zero: f64, scale: f64, min: T, max: T) -> Result<Self> {
        let floor = zero + min.to_f64() * scale;
        let ceiling = zero + max.to_f64() * scale;
        let range = ceiling - floor;

        if !T::IS_FLOAT && (range == 0.0 || !range.is_finite()) {
            return Err(DecodeError::DegenerateRange {
                min: min.to_f64(),
                max: max.to_f64(),
            });
        }

        Ok(Self {
            zero,
            scale,
            floor,
            range,
            _sample: PhantomData,
        })
    }

    /// Normalizer over the native range of `T`.
    pub fn native(zero: f64, scale: f64) -> Result<Self> {
        Self::new(zero, scale, T::MIN, T::MAX)
    }

    /// Normalizer over the smallest and largest value in `samples`.
    ///
    /// A constant frame has no usable range and fails with
    /// [`DecodeError::DegenerateRange`]. Float samples pass through as usual.
    pub fn from_data(zero: f64, scale: f64, samples: &[T]) -> Result<Self> {
        match data_range(samples) {
            Some((min, max)) => Self::new(zero, scale, min, max),
            None => Err(DecodeError::MissingData(
                "no samples to derive a range from".to_string(),
            )),
        }
    }

    #[inline(always)]
    pub fn apply(&self, sample: T) -> f32 {
        self.apply_value(sample.to_f64())
    }

    /// Normalizes a value already widened to `f64`, e.g. the mean of several
    /// neighbouring samples. The map is affine, so normalizing the mean
    /// equals the mean of the normalized samples.
    #[inline(always)]
    pub fn apply_value(&self, value: f64) -> f32 {
        if T::IS_FLOAT {
            value as f32
        } else {
            (((self.zero + value * self.scale) - self.floor) / self.range) as f32
        }
    }
}

/// Smallest and largest sample, ignoring values that do not compare (NaN).
pub fn data_range<T: Sample>(samples: &[T]) -> Option<(T, T)> {
    let mut values = samples.iter().copied().filter(|v| v.partial_cmp(v).is_some());
    let first = values.next()?;
    Some(values.fold((first, first), |(min, max), v| {
        (if v < min { v } else { min }, if v > max { v } else { max })
    }))
}

/// Normalizes a single sample: `normalize(v, zero, scale, min, max)`.
///
/// Decoders build a [`Normalizer`] once instead of calling this per pixel.
pub fn normalize<T: Sample>(value: T, zero: f64, scale: f64, min: T, max: T) -> Result<f32> {
    Ok(Normalizer::new(zero, scale, min, max)?.apply(value))
}
