//! Parallel heightfield fill.
//!
//! Output rows are split into contiguous bands, one per worker thread. Every
//! worker owns its band as an exclusive `&mut` slice of the preallocated
//! buffer, so no locking happens while sampling; the thread scope joins all
//! workers before [`ParallelHeightfieldBuilder::build`] returns.

use std::ops::Range;

use glam::DVec2;

use crate::config::GenerationConfig;
use crate::field::FeaturePointField;
use crate::heightfield::{Heightfield, SENTINEL};
use crate::sampler::NoiseSampler;

/// Worker count used when the caller does not pick one: all cores but one,
/// at least one.
pub fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// Split `rows` into `workers` contiguous, non-overlapping ranges.
///
/// Every range holds `rows / workers` rows and the last one also takes the
/// remainder. Worker counts of zero or above `rows` are clamped so that no
/// range is empty (except for a zero-row output, which yields one empty range).
pub fn partition_rows(rows: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, rows.max(1));
    let per_worker = rows / workers;

    (0..workers)
        .map(|i| {
            let start = i * per_worker;
            let end = if i + 1 == workers { rows } else { start + per_worker };
            start..end
        })
        .collect()
}

/// Fills a heightfield from a [`FeaturePointField`] on several threads.
#[derive(Clone, Copy, Debug)]
pub struct ParallelHeightfieldBuilder {
    output_size: (u32, u32),
    worker_count: usize,
}

impl ParallelHeightfieldBuilder {
    /// Builder for a `width × height` output using [`default_worker_count`].
    pub fn new(output_size: (u32, u32)) -> Self {
        Self {
            output_size,
            worker_count: default_worker_count(),
        }
    }

    /// Use exactly `worker_count` threads (0 is treated as 1).
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    /// Output `(width, height)`.
    pub fn output_size(&self) -> (u32, u32) {
        self.output_size
    }

    /// Configured worker count.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Sample every output cell and return the finished buffer.
    ///
    /// Output cell `(col, row)` samples the domain at
    /// `(col * domain_w / width, row * domain_h / height)`. Cells whose sample
    /// fails hold [`SENTINEL`]. The result does not depend on the worker
    /// count.
    ///
    /// # Panics
    ///
    /// Panics if a worker thread cannot be spawned or panics itself.
    pub fn build(&self, field: &FeaturePointField, config: &GenerationConfig) -> Heightfield {
        let width = self.output_size.0 as usize;
        let height = self.output_size.1 as usize;
        let mut heights = Heightfield::filled(width, height, SENTINEL);
        if width == 0 || height == 0 {
            return heights;
        }

        let sampler = NoiseSampler::new(field, config);
        let step = field.domain_size() / DVec2::new(width as f64, height as f64);
        let bands = partition_rows(height, self.worker_count);

        std::thread::scope(|scope| {
            let mut remaining = heights.as_mut_slice();
            for (index, rows) in bands.into_iter().enumerate() {
                let (band, rest) = std::mem::take(&mut remaining).split_at_mut(rows.len() * width);
                remaining = rest;

                std::thread::Builder::new()
                    .name(format!("heightfield-worker-{index}"))
                    .spawn_scoped(scope, move || {
                        fill_band(&sampler, band, rows, width, step);
                    })
                    .expect("Failed to spawn heightfield worker thread");
            }
        });

        heights
    }
}

/// Sample the rows `rows` into `band`, which holds exactly those rows.
fn fill_band(
    sampler: &NoiseSampler<'_>,
    band: &mut [f64],
    rows: Range<usize>,
    width: usize,
    step: DVec2,
) {
    let _span = tracing::trace_span!("fill_band", start = rows.start, end = rows.end).entered();

    for (row, out) in rows.zip(band.chunks_exact_mut(width)) {
        for (col, cell) in out.iter_mut().enumerate() {
            let point = DVec2::new(col as f64, row as f64) * step;
            *cell = sampler.sample(point).unwrap_or(SENTINEL);
        }
    }
}

/// Fill a `width × height` heightfield from `field` on `worker_count` threads.
pub fn build_heightfield(
    output_size: (u32, u32),
    field: &FeaturePointField,
    config: &GenerationConfig,
    worker_count: usize,
) -> Heightfield {
    ParallelHeightfieldBuilder::new(output_size)
        .with_workers(worker_count)
        .build(field, config)
}
