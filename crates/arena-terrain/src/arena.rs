//! Arena presets: the handful of game-facing knobs that pick the terrain.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::heightfield::is_sentinel;
use crate::metric::DistanceMetric;

/// Game-level terrain parameters for one arena.
///
/// The heightmap domain equals its resolution, so every output cell samples
/// an integer coordinate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaParameters {
    /// Side length of the square arena in world units.
    pub terrain_size: f64,
    /// World elevation of a normalized height of 1.0.
    pub terrain_height: f64,
    /// Partition cells per side.
    pub noise_subdivisions: u32,
    /// Upper bound (exclusive) on feature points per cell.
    pub turbulence: u32,
    /// Metric, which also picks the visual theme.
    pub terrain_type: DistanceMetric,
    /// Heightmap samples per world unit.
    pub detail_factor: f64,
    /// Fixed seed, or `None` for a new arena every time.
    pub random_seed: Option<u64>,
}

impl Default for ArenaParameters {
    fn default() -> Self {
        Self {
            terrain_size: 100.0,
            terrain_height: 10.0,
            noise_subdivisions: 100,
            turbulence: 10,
            terrain_type: DistanceMetric::Euclidean,
            detail_factor: 5.12,
            random_seed: None,
        }
    }
}

impl ArenaParameters {
    /// Heightmap samples per side, `terrain_size * detail_factor` truncated.
    pub fn heightmap_resolution(&self) -> u32 {
        (self.terrain_size * self.detail_factor).max(0.0) as u32
    }

    /// Output `(width, height)` of the arena heightmap.
    pub fn output_size(&self) -> (u32, u32) {
        let resolution = self.heightmap_resolution();
        (resolution, resolution)
    }

    /// Generation config sampling the nearest feature point over a domain the
    /// size of the heightmap.
    pub fn to_generation_config(&self) -> GenerationConfig {
        let resolution = f64::from(self.heightmap_resolution());
        GenerationConfig {
            domain_size: (resolution, resolution),
            grid_divisions: (self.noise_subdivisions, self.noise_subdivisions),
            max_points_per_cell: self.turbulence,
            metric: self.terrain_type,
            kth_nearest: 1,
            seed: self.random_seed,
        }
    }

    /// Name of the material theme used for this terrain type.
    pub fn terrain_theme(&self) -> Option<&'static str> {
        match self.terrain_type {
            DistanceMetric::Euclidean => Some("Sand"),
            DistanceMetric::EuclideanSquared => Some("Blasted Canyon"),
            DistanceMetric::Manhattan => Some("Glacier"),
            DistanceMetric::Chebyshev => Some("Tech World"),
            DistanceMetric::Quadratic => Some("Distant World"),
            DistanceMetric::Minkowski(_) => None,
        }
    }

    /// World elevation of a normalized height, `None` for the sentinel.
    pub fn elevation(&self, normalized: f64) -> Option<f64> {
        (!is_sentinel(normalized)).then(|| normalized * self.terrain_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::SENTINEL;

    #[test]
    fn test_default_resolution() {
        let arena = ArenaParameters::default();
        assert_eq!(arena.heightmap_resolution(), 512);
        assert_eq!(arena.output_size(), (512, 512));
    }

    #[test]
    fn test_generation_config_mirrors_parameters() {
        let arena = ArenaParameters {
            terrain_size: 20.0,
            detail_factor: 2.0,
            noise_subdivisions: 8,
            turbulence: 5,
            terrain_type: DistanceMetric::Chebyshev,
            random_seed: Some(99),
            ..Default::default()
        };
        let config = arena.to_generation_config();
        assert_eq!(config.domain_size, (40.0, 40.0));
        assert_eq!(config.grid_divisions, (8, 8));
        assert_eq!(config.max_points_per_cell, 5);
        assert_eq!(config.metric, DistanceMetric::Chebyshev);
        assert_eq!(config.kth_nearest, 1);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_zero_subdivisions_fail_validation() {
        let arena = ArenaParameters {
            noise_subdivisions: 0,
            ..Default::default()
        };
        assert!(arena.to_generation_config().validate().is_err());
    }

    #[test]
    fn test_themes() {
        let theme = |terrain_type| {
            ArenaParameters {
                terrain_type,
                ..Default::default()
            }
            .terrain_theme()
        };
        assert_eq!(theme(DistanceMetric::Euclidean), Some("Sand"));
        assert_eq!(theme(DistanceMetric::Manhattan), Some("Glacier"));
        assert_eq!(theme(DistanceMetric::Minkowski(3.0)), None);
    }

    #[test]
    fn test_elevation() {
        let arena = ArenaParameters::default();
        assert_eq!(arena.elevation(0.5), Some(5.0));
        assert_eq!(arena.elevation(SENTINEL), None);
    }
}
