//! Row-band tiling across a fixed-size worker pool
//!
//! Images are split into contiguous bands of scanlines. Every band starts on
//! a multiple of the decoder's row period, so a 2x2 CFA block never straddles
//! two workers. Workers read the same input and write disjoint output
//! slices; the call returns once every band has finished.

use std::ops::Range;

use tracing::debug;

use crate::image_pipeline::common::error::{DecodeError, Result};

/// Worker count used when none is configured.
pub const DEFAULT_THREADS: usize = 8;

/// Explicit worker pool handed to the decoders.
///
/// A pool with one thread runs every band inline on the calling thread.
pub struct WorkerPool {
    threads: usize,
    pool: Option<rayon::ThreadPool>,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(DecodeError::WorkerPool(
                "worker pool needs at least one thread".to_string(),
            ));
        }

        let pool = if threads == 1 {
            None
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("fits-decode-{}", i))
                .build()
                .map_err(|e| DecodeError::WorkerPool(e.to_string()))?;
            Some(pool)
        };

        debug!(threads, "Worker pool ready");
        Ok(Self { threads, pool })
    }

    /// Pool that runs everything on the calling thread.
    pub fn inline() -> Self {
        Self {
            threads: 1,
            pool: None,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Whether work runs on the calling thread.
    pub fn is_inline(&self) -> bool {
        self.pool.is_none()
    }

    /// Splits `[0, height)` into at most `threads` bands, each starting on a
    /// multiple of `period`.
    pub fn bands(&self, height: usize, period: usize) -> Vec<Range<usize>> {
        split_bands(height, self.threads, period)
    }

    /// Runs `f` once per `(band, output)` pair and blocks until all finish.
    pub fn for_each_band<W, F>(&self, work: Vec<(Range<usize>, W)>, f: F)
    where
        W: Send,
        F: Fn(Range<usize>, W) + Sync,
    {
        match &self.pool {
            Some(pool) if work.len() > 1 => {
                let f = &f;
                pool.scope(|scope| {
                    for (rows, output) in work {
                        scope.spawn(move |_| f(rows, output));
                    }
                });
            }
            _ => {
                for (rows, output) in work {
                    f(rows, output);
                }
            }
        }
    }

    /// Runs `op` inside the pool so nested rayon iterators use its workers.
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::inline()
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}

/// Band `i` of `n` covers `[i*h/n, (i+1)*h/n)` with both bounds rounded down
/// to `period`; the last band always ends at `height`. Empty bands are
/// dropped.
pub fn split_bands(height: usize, workers: usize, period: usize) -> Vec<Range<usize>> {
    let period = period.max(1);
    let workers = workers.clamp(1, (height / period).max(1));

    let boundary = |i: usize| (i * height / workers) / period * period;

    let mut bands = Vec::with_capacity(workers);
    for i in 0..workers {
        let start = boundary(i);
        let end = if i + 1 == workers { height } else { boundary(i + 1) };
        if start < end {
            bands.push(start..end);
        }
    }
    bands
}

/// Cuts a row-major buffer into one mutable slice per band.
///
/// `row_len` is the number of elements per scanline. Bands must be sorted,
/// contiguous and start at row 0.
pub fn split_rows_mut<'a, C>(
    mut buffer: &'a mut [C],
    bands: &[Range<usize>],
    row_len: usize,
) -> Vec<&'a mut [C]> {
    let mut slices = Vec::with_capacity(bands.len());
    for band in bands {
        let (head, tail) = buffer.split_at_mut(band.len() * row_len);
        slices.push(head);
        buffer = tail;
    }
    slices
}

pub type PlaneSlices<'a, C> = (&'a mut [C], &'a mut [C], &'a mut [C]);

/// Pairs each band with its rows of the three output planes.
pub fn planar_work<'a, C>(
    pool: &WorkerPool,
    width: usize,
    height: usize,
    period: usize,
    red: &'a mut [C],
    green: &'a mut [C],
    blue: &'a mut [C],
) -> Vec<(Range<usize>, PlaneSlices<'a, C>)> {
    let bands = pool.bands(height, period);
    let r = split_rows_mut(red, &bands, width);
    let g = split_rows_mut(green, &bands, width);
    let b = split_rows_mut(blue, &bands, width);
    bands
        .into_iter()
        .zip(r.into_iter().zip(g).zip(b))
        .map(|(rows, ((r, g), b))| (rows, (r, g, b)))
        .collect()
}
