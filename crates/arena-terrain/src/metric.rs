//! Distance metrics for cellular noise.
//!
//! The metric decides the shape of the cell boundaries in the generated
//! terrain: round for Euclidean, diamond for Manhattan, square for Chebyshev.
//! All square roots and powers go through `libm` so a given seed produces
//! bit-identical terrain on every platform.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// The distance function used to rank feature points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Straight-line distance, `sqrt(dx² + dy²)`.
    #[default]
    Euclidean,
    /// Squared straight-line distance, `dx² + dy²`.
    EuclideanSquared,
    /// Taxicab distance, `|dx| + |dy|`.
    Manhattan,
    /// Chessboard distance, `max(|dx|, |dy|)`.
    Chebyshev,
    /// Skewed quadratic form, `dx² + dx·dy + dy²`.
    Quadratic,
    /// Generalized p-norm, `(|dx|^p + |dy|^p)^(1/p)`. `p` must be positive.
    Minkowski(f64),
}

impl DistanceMetric {
    /// All metric families, with `Minkowski` at `p = 3`.
    pub const ALL: [DistanceMetric; 6] = [
        DistanceMetric::Euclidean,
        DistanceMetric::EuclideanSquared,
        DistanceMetric::Manhattan,
        DistanceMetric::Chebyshev,
        DistanceMetric::Quadratic,
        DistanceMetric::Minkowski(3.0),
    ];

    /// Returns `true` for metrics whose output grows with the square of the
    /// offset. These need a tighter normalization length.
    pub fn is_squared_magnitude(self) -> bool {
        matches!(self, Self::EuclideanSquared | Self::Quadratic)
    }

    /// Stable lowercase name, the inverse of [`FromStr`] (minus the exponent).
    pub fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::EuclideanSquared => "euclidean-squared",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
            Self::Quadratic => "quadratic",
            Self::Minkowski(_) => "minkowski",
        }
    }

    /// Distance between `a` and `b` under this metric.
    #[inline]
    pub fn distance(self, a: DVec2, b: DVec2) -> f64 {
        distance(a, b, self)
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minkowski(p) => write!(f, "minkowski:{p}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Error returned when a metric name cannot be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseMetricError {
    /// The name matches none of the known metrics.
    #[error("unknown distance metric: {0:?}")]
    UnknownMetric(String),
    /// `minkowski` was given without a usable exponent.
    #[error("minkowski metric needs a numeric exponent, e.g. `minkowski:3`, got {0:?}")]
    BadExponent(String),
}

impl FromStr for DistanceMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(exponent) = lower.strip_prefix("minkowski") {
            let exponent = exponent
                .strip_prefix(':')
                .ok_or_else(|| ParseMetricError::BadExponent(s.to_string()))?;
            let p = exponent
                .parse::<f64>()
                .map_err(|_| ParseMetricError::BadExponent(s.to_string()))?;
            return Ok(Self::Minkowski(p));
        }

        match lower.as_str() {
            "euclidean" | "linear" => Ok(Self::Euclidean),
            "euclidean-squared" | "euclidean_squared" | "linear2" => Ok(Self::EuclideanSquared),
            "manhattan" => Ok(Self::Manhattan),
            "chebyshev" => Ok(Self::Chebyshev),
            "quadratic" => Ok(Self::Quadratic),
            _ => Err(ParseMetricError::UnknownMetric(s.to_string())),
        }
    }
}

/// Distance between two points under `metric`.
///
/// Pure and total for finite inputs. The Minkowski exponent is not checked
/// here; [`GenerationConfig::validate`](crate::GenerationConfig::validate)
/// rejects non-positive exponents before any sampling happens.
///
/// Minkowski is evaluated as `m * (1 + (n / m)^p)^(1/p)` with `m` the larger
/// and `n` the smaller axis offset, so large exponents cannot overflow the
/// intermediate powers. Very small exponents can still exceed `f64::MAX`;
/// use [`ln_distance`] when the ratio of two distances is what matters.
pub fn distance(a: DVec2, b: DVec2, metric: DistanceMetric) -> f64 {
    let d = a - b;
    match metric {
        DistanceMetric::Euclidean => libm::sqrt(d.x * d.x + d.y * d.y),
        DistanceMetric::EuclideanSquared => d.x * d.x + d.y * d.y,
        DistanceMetric::Manhattan => d.x.abs() + d.y.abs(),
        DistanceMetric::Chebyshev => d.x.abs().max(d.y.abs()),
        DistanceMetric::Quadratic => d.x * d.x + d.x * d.y + d.y * d.y,
        DistanceMetric::Minkowski(p) => {
            let (major, minor) = axis_extents(d);
            if major == 0.0 {
                return 0.0;
            }
            major * libm::pow(1.0 + libm::pow(minor / major, p), 1.0 / p)
        }
    }
}

/// Natural log of [`distance`], `-inf` for a zero offset.
///
/// Stays finite for every positive Minkowski exponent, where the distance
/// itself may not.
pub fn ln_distance(a: DVec2, b: DVec2, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Minkowski(p) => {
            let (major, minor) = axis_extents(a - b);
            if major == 0.0 {
                return f64::NEG_INFINITY;
            }
            libm::log(major) + libm::log1p(libm::pow(minor / major, p)) / p
        }
        _ => libm::log(distance(a, b, metric)),
    }
}

/// `(larger, smaller)` of the absolute axis offsets.
fn axis_extents(d: DVec2) -> (f64, f64) {
    let (x, y) = (d.x.abs(), d.y.abs());
    if x >= y { (x, y) } else { (y, x) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_known_values_for_3_4_offset() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(3.0, 4.0);

        let expected = [
            (DistanceMetric::Euclidean, 5.0),
            (DistanceMetric::EuclideanSquared, 25.0),
            (DistanceMetric::Manhattan, 7.0),
            (DistanceMetric::Chebyshev, 4.0),
            (DistanceMetric::Quadratic, 9.0 + 12.0 + 16.0),
            (DistanceMetric::Minkowski(1.0), 7.0),
            (DistanceMetric::Minkowski(2.0), 5.0),
        ];

        for (metric, want) in expected {
            let got = distance(a, b, metric);
            assert!(
                (got - want).abs() < 1e-9,
                "{metric}: expected {want}, got {got}"
            );
        }
    }

    #[test]
    fn test_minkowski_extreme_exponents_stay_finite() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(13.5, 9.25);

        // Large p approaches Chebyshev.
        let got = distance(a, b, DistanceMetric::Minkowski(400.0));
        assert!(
            got.is_finite() && (got - 13.5).abs() < 1e-6,
            "p = 400 should be close to the larger axis, got {got}"
        );

        // Tiny p overflows the plain distance, but its log stays finite.
        let ln = ln_distance(a, b, DistanceMetric::Minkowski(0.0004));
        assert!(ln.is_finite(), "p = 0.0004 log distance must be finite, got {ln}");

        // A single-axis offset is exact for every exponent.
        for p in [0.0004, 0.5, 3.0, 400.0] {
            let axis = distance(a, DVec2::new(0.0, -6.0), DistanceMetric::Minkowski(p));
            assert!((axis - 6.0).abs() < 1e-9, "p = {p}: expected 6, got {axis}");
        }
    }

    #[test]
    fn test_ln_distance_matches_distance() {
        let a = DVec2::new(1.0, 2.0);
        let b = DVec2::new(4.5, -3.0);
        for metric in DistanceMetric::ALL {
            let want = libm::log(distance(a, b, metric));
            let got = ln_distance(a, b, metric);
            assert!((got - want).abs() < 1e-9, "{metric}: expected {want}, got {got}");
        }
        assert_eq!(
            ln_distance(a, a, DistanceMetric::Minkowski(2.0)),
            f64::NEG_INFINITY,
            "zero offset has no finite log"
        );
    }

    #[test]
    fn test_metric_symmetry() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let a = DVec2::new(rng.random_range(-1e3..1e3), rng.random_range(-1e3..1e3));
            let b = DVec2::new(rng.random_range(-1e3..1e3), rng.random_range(-1e3..1e3));
            for metric in DistanceMetric::ALL {
                let ab = distance(a, b, metric);
                let ba = distance(b, a, metric);
                assert!(
                    (ab - ba).abs() <= EPSILON * ab.abs().max(1.0),
                    "{metric} not symmetric for {a} / {b}: {ab} vs {ba}"
                );
            }
        }
    }

    #[test]
    fn test_zero_offset_is_zero() {
        let p = DVec2::new(12.5, -3.25);
        for metric in DistanceMetric::ALL {
            assert_eq!(distance(p, p, metric), 0.0, "{metric} of zero offset");
        }
    }

    #[test]
    fn test_chebyshev_picks_larger_axis() {
        let origin = DVec2::ZERO;
        assert_eq!(distance(origin, DVec2::new(-9.0, 2.0), DistanceMetric::Chebyshev), 9.0);
        assert_eq!(distance(origin, DVec2::new(2.0, 2.0), DistanceMetric::Chebyshev), 2.0);
    }

    #[test]
    fn test_squared_magnitude_flag() {
        let squared: Vec<_> = DistanceMetric::ALL
            .into_iter()
            .filter(|m| m.is_squared_magnitude())
            .collect();
        assert_eq!(
            squared,
            vec![DistanceMetric::EuclideanSquared, DistanceMetric::Quadratic]
        );
    }

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("Euclidean".parse(), Ok(DistanceMetric::Euclidean));
        assert_eq!("linear".parse(), Ok(DistanceMetric::Euclidean));
        assert_eq!("linear2".parse(), Ok(DistanceMetric::EuclideanSquared));
        assert_eq!("manhattan".parse(), Ok(DistanceMetric::Manhattan));
        assert_eq!(" chebyshev ".parse(), Ok(DistanceMetric::Chebyshev));
        assert_eq!("quadratic".parse(), Ok(DistanceMetric::Quadratic));
        assert_eq!("minkowski:0.5".parse(), Ok(DistanceMetric::Minkowski(0.5)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "hamming".parse::<DistanceMetric>(),
            Err(ParseMetricError::UnknownMetric(_))
        ));
        assert!(matches!(
            "minkowski".parse::<DistanceMetric>(),
            Err(ParseMetricError::BadExponent(_))
        ));
        assert!(matches!(
            "minkowski:abc".parse::<DistanceMetric>(),
            Err(ParseMetricError::BadExponent(_))
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for metric in DistanceMetric::ALL {
            let text = metric.to_string();
            assert_eq!(text.parse::<DistanceMetric>(), Ok(metric), "round trip of {text}");
        }
    }
}
