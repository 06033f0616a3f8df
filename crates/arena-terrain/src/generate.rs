//! One-call generation: validate, scatter, fill.

use std::time::Instant;

use crate::builder::ParallelHeightfieldBuilder;
use crate::config::{ConfigError, GenerationConfig};
use crate::field::FeaturePointField;
use crate::heightfield::Heightfield;

/// Generate a complete heightfield for `config`.
///
/// Validation happens before any thread starts. Past that point the call
/// cannot fail: undefined samples show up as sentinels in the result.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` is invalid.
pub fn generate_heightfield(
    config: &GenerationConfig,
    output_size: (u32, u32),
    worker_count: usize,
) -> Result<Heightfield, ConfigError> {
    let start = Instant::now();
    let field = FeaturePointField::build(config)?;
    let scattered = start.elapsed();

    let builder = ParallelHeightfieldBuilder::new(output_size).with_workers(worker_count);
    let heights = builder.build(&field, config);

    let stats = heights.stats();
    tracing::info!(
        width = output_size.0,
        height = output_size.1,
        workers = builder.worker_count(),
        metric = %config.metric,
        feature_points = field.point_count(),
        sentinels = stats.sentinel_count,
        scatter_us = scattered.as_micros() as u64,
        total_us = start.elapsed().as_micros() as u64,
        "generated heightfield"
    );
    if stats.sentinel_count > 0 {
        tracing::debug!(
            sentinels = stats.sentinel_count,
            "some cells have no usable height"
        );
    }

    Ok(heights)
}
