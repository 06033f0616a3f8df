//! Worley noise sampling: the k-th nearest feature point under a metric.

use glam::DVec2;

use crate::config::GenerationConfig;
use crate::field::FeaturePointField;
use crate::metric::{DistanceMetric, distance, ln_distance};

/// Normalization factor for metrics that grow quadratically.
const SQUARED_NORMALIZATION: f64 = 0.1;
/// Normalization factor for every other metric.
const LINEAR_NORMALIZATION: f64 = 0.5;

/// Why a single sample has no value.
///
/// Neither variant is fatal: the heightfield builder records the sentinel for
/// the affected output cell and carries on.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SampleError {
    /// The query point is outside `[0, domain)` on at least one axis.
    #[error("sample point ({x}, {y}) is outside the domain")]
    OutOfBounds {
        /// Query x.
        x: f64,
        /// Query y.
        y: f64,
    },

    /// The 3×3 neighborhood holds fewer points than the requested rank.
    #[error("found {found} candidate points, need at least {required}")]
    InsufficientCandidates {
        /// Candidates gathered from the neighborhood.
        found: usize,
        /// `kth_nearest` of the config.
        required: u32,
    },
}

/// Length that maps a raw distance to a roughly unit-range value.
///
/// `distance(0, cell_size)` scaled by 0.1 for squared-magnitude metrics and
/// 0.5 otherwise. The factors are tuned by eye for terrain amplitude, not
/// derived; outputs typically land in `[0, ~1.2]`.
///
/// Overflows to infinity for Minkowski exponents close to zero. The sampler
/// normalizes those in log space instead.
pub fn normalization_length(cell_size: DVec2, metric: DistanceMetric) -> f64 {
    distance(DVec2::ZERO, cell_size, metric) * normalization_factor(metric)
}

fn normalization_factor(metric: DistanceMetric) -> f64 {
    if metric.is_squared_magnitude() {
        SQUARED_NORMALIZATION
    } else {
        LINEAR_NORMALIZATION
    }
}

/// Samples cellular noise from a [`FeaturePointField`].
///
/// Holds only shared references, so one sampler can be used from many
/// threads at once.
#[derive(Clone, Copy, Debug)]
pub struct NoiseSampler<'a> {
    field: &'a FeaturePointField,
    metric: DistanceMetric,
    kth_nearest: u32,
    /// Normalization length, or its natural log when `log_scale` is set.
    max_length: f64,
    /// Minkowski distances are ranked and normalized as logs.
    log_scale: bool,
}

impl<'a> NoiseSampler<'a> {
    /// Create a sampler over `field` using the metric and rank of `config`.
    ///
    /// Cell geometry comes from the field; `config` is expected to have been
    /// validated when the field was built.
    pub fn new(field: &'a FeaturePointField, config: &GenerationConfig) -> Self {
        let log_scale = matches!(config.metric, DistanceMetric::Minkowski(_));
        let max_length = if log_scale {
            libm::log(normalization_factor(config.metric))
                + ln_distance(DVec2::ZERO, field.cell_size(), config.metric)
        } else {
            normalization_length(field.cell_size(), config.metric)
        };
        Self {
            field,
            metric: config.metric,
            kth_nearest: config.kth_nearest,
            max_length,
            log_scale,
        }
    }

    /// The field this sampler reads.
    pub fn field(&self) -> &'a FeaturePointField {
        self.field
    }

    /// Normalized distance from `point` to its k-th nearest feature point.
    ///
    /// Only the 3×3 block of cells around the point is searched. With sparse
    /// cells and a high rank the true k-th nearest point can lie further out;
    /// that point is then missed and a farther candidate is used instead.
    ///
    /// # Errors
    ///
    /// [`SampleError::OutOfBounds`] for points outside the domain and
    /// [`SampleError::InsufficientCandidates`] when the neighborhood holds
    /// fewer than `kth_nearest` points.
    pub fn sample(&self, point: DVec2) -> Result<f64, SampleError> {
        let (cell_x, cell_y) = self
            .field
            .cell_of(point)
            .ok_or(SampleError::OutOfBounds {
                x: point.x,
                y: point.y,
            })?;

        let mut candidates: Vec<f64> = self
            .field
            .neighborhood(cell_x, cell_y)
            .map(|&candidate| {
                if self.log_scale {
                    ln_distance(point, candidate, self.metric)
                } else {
                    distance(point, candidate, self.metric)
                }
            })
            .collect();

        let k = self.kth_nearest as usize;
        if k == 0 || candidates.len() < k {
            return Err(SampleError::InsufficientCandidates {
                found: candidates.len(),
                required: self.kth_nearest,
            });
        }

        // Stable, so equal distances keep neighborhood order.
        candidates.sort_by(f64::total_cmp);

        let kth = candidates[k - 1];
        if self.log_scale {
            Ok(libm::exp(kth - self.max_length))
        } else {
            Ok(kth / self.max_length)
        }
    }
}

/// Sample `field` at `point` with the metric and rank of `config`.
///
/// Convenience for one-off samples; use [`NoiseSampler`] in loops so the
/// normalization length is computed once.
pub fn sample(
    point: DVec2,
    field: &FeaturePointField,
    config: &GenerationConfig,
) -> Result<f64, SampleError> {
    NoiseSampler::new(field, config).sample(point)
}
