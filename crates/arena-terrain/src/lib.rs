//! Cellular (Worley) noise heightfields for arena terrain: feature point
//! scatter, distance metrics, k-th nearest sampling and a multi-threaded fill.

mod arena;
mod builder;
mod config;
mod field;
mod generate;
mod heightfield;
mod metric;
mod sampler;

pub use arena::ArenaParameters;
pub use builder::{
    ParallelHeightfieldBuilder, build_heightfield, default_worker_count, partition_rows,
};
pub use config::{ConfigError, GenerationConfig};
pub use field::{Cell, FeaturePointField};
pub use generate::generate_heightfield;
pub use heightfield::{Heightfield, HeightfieldError, HeightfieldStats, SENTINEL, is_sentinel};
pub use metric::{DistanceMetric, ParseMetricError, distance, ln_distance};
pub use sampler::{NoiseSampler, SampleError, normalization_length, sample};
