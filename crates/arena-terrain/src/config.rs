//! Generation parameters and their validation.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::metric::DistanceMetric;

/// Errors that reject a [`GenerationConfig`] before any sampling starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The Minkowski exponent is zero, negative or not finite.
    #[error("minkowski exponent must be a finite number greater than zero, got {0}")]
    InvalidMinkowskiExponent(f64),

    /// One of the grid axes has no cells.
    #[error("grid divisions must be at least 1x1, got {columns}x{rows}")]
    InvalidGridDivisions {
        /// Requested columns.
        columns: u32,
        /// Requested rows.
        rows: u32,
    },

    /// `kth_nearest` is zero. The nearest point is rank 1.
    #[error("kth_nearest must be at least 1")]
    InvalidKthNearest,

    /// The sampling domain is empty or not finite.
    #[error("domain size must be finite and positive, got {width}x{height}")]
    InvalidDomainSize {
        /// Requested domain width.
        width: f64,
        /// Requested domain height.
        height: f64,
    },

    /// An explicit point layout has the wrong number of cells.
    #[error("expected {expected} cells, got {actual}")]
    CellCountMismatch {
        /// `columns * rows` of the config.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },

    /// An explicit point layout places a point outside its cell.
    #[error("point ({x}, {y}) lies outside cell ({cell_x}, {cell_y})")]
    PointOutsideCell {
        /// Cell column.
        cell_x: u32,
        /// Cell row.
        cell_y: u32,
        /// Point x.
        x: f64,
        /// Point y.
        y: f64,
    },
}

/// Everything needed to build one cellular-noise heightfield.
///
/// Created once per generation request and never mutated while a field is
/// being built or sampled. Missing fields fall back to [`Default`] when
/// deserialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Size of the sampling domain `(width, height)`, in the same units as
    /// output grid coordinates.
    pub domain_size: (f64, f64),
    /// Number of partition cells `(columns, rows)`.
    pub grid_divisions: (u32, u32),
    /// Exclusive upper bound on the number of feature points in one cell.
    pub max_points_per_cell: u32,
    /// Metric used to rank feature points.
    pub metric: DistanceMetric,
    /// Which neighbor is sampled: 1 is the nearest (F1), 2 the second (F2)...
    pub kth_nearest: u32,
    /// Deterministic seed. `None` draws a fresh seed for every field.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            domain_size: (64.0, 64.0),
            grid_divisions: (4, 4),
            max_points_per_cell: 3,
            metric: DistanceMetric::Euclidean,
            kth_nearest: 1,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Check every invariant the field builder and sampler rely on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.domain_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidDomainSize { width, height });
        }

        let (columns, rows) = self.grid_divisions;
        if columns < 1 || rows < 1 {
            return Err(ConfigError::InvalidGridDivisions { columns, rows });
        }

        if self.kth_nearest < 1 {
            return Err(ConfigError::InvalidKthNearest);
        }

        if let DistanceMetric::Minkowski(p) = self.metric
            && !(p.is_finite() && p > 0.0)
        {
            return Err(ConfigError::InvalidMinkowskiExponent(p));
        }

        Ok(())
    }

    /// Domain size as a vector.
    pub fn domain(&self) -> DVec2 {
        DVec2::new(self.domain_size.0, self.domain_size.1)
    }

    /// Width and height of a single partition cell.
    pub fn cell_size(&self) -> DVec2 {
        self.domain()
            / DVec2::new(
                f64::from(self.grid_divisions.0),
                f64::from(self.grid_divisions.1),
            )
    }

    /// Total number of partition cells.
    pub fn cell_count(&self) -> usize {
        self.grid_divisions.0 as usize * self.grid_divisions.1 as usize
    }
}
