//! Typed raw planes cast from big-endian data units.

use rayon::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{DecodeError, Result};
use crate::image_pipeline::parallel::WorkerPool;
use crate::image_pipeline::sample::normalize::Sample;

/// Samples per parallel cast chunk.
const CAST_CHUNK: usize = 16384;

/// A contiguous `width * height * layers` block of typed samples.
///
/// Layers are stored one after another (all of layer 0, then layer 1, ...).
#[derive(Debug, Clone)]
pub struct RawPlane<T> {
    samples: Vec<T>,
    width: usize,
    height: usize,
    layers: usize,
}

impl<T: Sample> RawPlane<T> {
    /// Casts a big-endian data unit into typed samples.
    ///
    /// Only the first `width * height * layers` samples are read; trailing
    /// bytes (FITS pads data units to 2880-byte blocks) are ignored. A buffer
    /// that is empty or too short is [`DecodeError::MissingData`].
    ///
    /// The cast runs on `pool`; an inline pool casts on the calling thread.
    pub fn from_be_bytes(
        pool: &WorkerPool,
        bytes: &[u8],
        width: usize,
        height: usize,
        layers: usize,
    ) -> Result<Self> {
        let count = sample_count(width, height, layers)?;
        let needed = count
            .checked_mul(T::BYTES)
            .ok_or_else(|| DecodeError::InvalidMetadata("data unit size overflows".to_string()))?;

        if bytes.is_empty() {
            return Err(DecodeError::MissingData("data unit is empty".to_string()));
        }
        if bytes.len() < needed {
            return Err(DecodeError::MissingData(format!(
                "data unit holds {} bytes, {}x{}x{} {} samples need {}",
                bytes.len(),
                width,
                height,
                layers,
                T::TYPE,
                needed
            )));
        }

        debug!(width, height, layers, bytes = needed, "Casting big-endian samples");

        let bytes = &bytes[..needed];
        let samples: Vec<T> = if pool.is_inline() {
            bytes.chunks_exact(T::BYTES).map(T::from_be_slice).collect()
        } else {
            pool.install(|| {
                bytes
                    .par_chunks(CAST_CHUNK * T::BYTES)
                    .flat_map_iter(|chunk| chunk.chunks_exact(T::BYTES).map(T::from_be_slice))
                    .collect()
            })
        };

        Ok(Self {
            samples,
            width,
            height,
            layers,
        })
    }

    /// Wraps samples that are already in native byte order.
    pub fn from_samples(samples: Vec<T>, width: usize, height: usize, layers: usize) -> Result<Self> {
        let count = sample_count(width, height, layers)?;
        if samples.len() != count {
            return Err(DecodeError::MissingData(format!(
                "expected {} samples for {}x{}x{}, got {}",
                count,
                width,
                height,
                layers,
                samples.len()
            )));
        }
        Ok(Self {
            samples,
            width,
            height,
            layers,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn layer_size(&self) -> usize {
        self.width * self.height
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// The `index`-th layer, if present.
    pub fn layer(&self, index: usize) -> Option<&[T]> {
        if index >= self.layers {
            return None;
        }
        let size = self.layer_size();
        Some(&self.samples[index * size..(index + 1) * size])
    }

    /// Borrowed view over every layer.
    pub fn view(&self) -> PlaneView<'_, T> {
        PlaneView {
            samples: &self.samples,
            width: self.width,
            height: self.height,
            layers: self.layers,
        }
    }

    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }
}

/// Read-only view of a `width * height * layers` block of samples.
///
/// Decoders only ever borrow their input; every worker reads the same view.
/// A view always holds exactly `width * height * layers` samples.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a, T> {
    samples: &'a [T],
    width: usize,
    height: usize,
    layers: usize,
}

impl<'a, T: Sample> PlaneView<'a, T> {
    /// Checks that `samples` holds exactly `width * height * layers` values.
    pub fn new(samples: &'a [T], width: usize, height: usize, layers: usize) -> Result<Self> {
        let count = sample_count(width, height, layers)?;
        if samples.len() < count {
            return Err(DecodeError::MissingData(format!(
                "expected {} samples for {}x{}x{}, got {}",
                count,
                width,
                height,
                layers,
                samples.len()
            )));
        }
        Ok(Self {
            samples: &samples[..count],
            width,
            height,
            layers,
        })
    }

    pub fn samples(&self) -> &'a [T] {
        self.samples
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn pixels(&self) -> usize {
        self.width * self.height
    }

    pub fn layer(&self, index: usize) -> Option<&'a [T]> {
        if index >= self.layers {
            return None;
        }
        let size = self.pixels();
        Some(&self.samples[index * size..(index + 1) * size])
    }
}

fn sample_count(width: usize, height: usize, layers: usize) -> Result<usize> {
    if width == 0 || height == 0 || layers == 0 {
        return Err(DecodeError::InvalidMetadata(format!(
            "plane dimensions must be non-zero: {}x{}x{}",
            width, height, layers
        )));
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(layers))
        .ok_or_else(|| DecodeError::InvalidMetadata("plane size overflows".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Arc, RwLock};
    use std::time::Duration;

    use super::*;

    fn be_bytes_i16(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn test_cast_i16() {
        let bytes = be_bytes_i16(&[1, -1, 300, i16::MIN]);
        let plane = RawPlane::<i16>::from_be_bytes(&WorkerPool::inline(), &bytes, 2, 2, 1).unwrap();
        assert_eq!(plane.samples(), &[1, -1, 300, i16::MIN]);
    }

    #[test]
    fn test_cast_f64() {
        let bytes: Vec<u8> = [0.5f64, -2.0].iter().flat_map(|v| v.to_be_bytes()).collect();
        let plane = RawPlane::<f64>::from_be_bytes(&WorkerPool::inline(), &bytes, 2, 1, 1).unwrap();
        assert_eq!(plane.samples(), &[0.5, -2.0]);
    }

    #[test]
    fn test_cast_ignores_padding() {
        let mut bytes = be_bytes_i16(&[7, 8]);
        bytes.extend_from_slice(&[0u8; 10]);
        let plane = RawPlane::<i16>::from_be_bytes(&WorkerPool::inline(), &bytes, 2, 1, 1).unwrap();
        assert_eq!(plane.samples(), &[7, 8]);
    }

    #[test]
    fn test_cast_large_buffer_spans_chunks() {
        let values: Vec<i16> = (0..40_000).map(|v| (v % 30_000) as i16).collect();
        let bytes = be_bytes_i16(&values);
        for threads in [1, 2, 3] {
            let pool = WorkerPool::new(threads).unwrap();
            let plane = RawPlane::<i16>::from_be_bytes(&pool, &bytes, 200, 200, 1).unwrap();
            assert_eq!(plane.samples(), values.as_slice());
        }
    }

    #[test]
    fn test_inline_cast_ignores_global_pool() {
        // Park every worker of rayon's global pool until the cast is done.
        let gate = Arc::new(RwLock::new(()));
        let held = gate.write().unwrap();
        let parked = Arc::clone(&gate);
        rayon::spawn_broadcast(move |_| {
            let _guard = parked.read();
        });

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let bytes = vec![7u8; 256 * 256];
            let cast = RawPlane::<u8>::from_be_bytes(&WorkerPool::inline(), &bytes, 256, 256, 1)
                .map(|plane| plane.samples().len());
            let _ = tx.send(cast);
        });

        let result = rx.recv_timeout(Duration::from_secs(10));
        drop(held);
        assert_eq!(result.unwrap().unwrap(), 256 * 256);
    }

    #[test]
    fn test_short_buffer() {
        let bytes = be_bytes_i16(&[1, 2, 3]);
        let err = RawPlane::<i16>::from_be_bytes(&WorkerPool::inline(), &bytes, 2, 2, 1).unwrap_err();
        assert!(matches!(err, DecodeError::MissingData(_)));
    }

    #[test]
    fn test_empty_buffer() {
        let err = RawPlane::<u8>::from_be_bytes(&WorkerPool::inline(), &[], 2, 2, 1).unwrap_err();
        assert!(matches!(err, DecodeError::MissingData(_)));
    }

    #[test]
    fn test_zero_dimension() {
        let err = RawPlane::<u8>::from_be_bytes(&WorkerPool::inline(), &[1, 2], 0, 2, 1).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidMetadata(_)));
    }

    #[test]
    fn test_layers() {
        let plane = RawPlane::from_samples(vec![1u8, 2, 3, 4, 5, 6], 2, 1, 3).unwrap();
        assert_eq!(plane.layer(0), Some(&[1u8, 2][..]));
        assert_eq!(plane.layer(2), Some(&[5u8, 6][..]));
        assert_eq!(plane.layer(3), None);

        let view = plane.view();
        assert_eq!(view.pixels(), 2);
        assert_eq!(view.layer(1), Some(&[3u8, 4][..]));
    }

    #[test]
    fn test_view_rejects_short_slice() {
        let samples = [1i16, 2, 3];
        let err = PlaneView::new(&samples, 2, 2, 1).unwrap_err();
        assert!(matches!(err, DecodeError::MissingData(_)));

        let view = PlaneView::new(&[1i16, 2, 3, 4, 5], 2, 2, 1).unwrap();
        assert_eq!(view.samples(), &[1, 2, 3, 4]);
        assert_eq!((view.width(), view.height(), view.layers()), (2, 2, 1));
    }
}
