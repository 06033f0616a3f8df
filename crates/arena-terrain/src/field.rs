//! Feature point field: a uniform cell partition of the sampling domain with a
//! random scatter of feature points in every cell.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{ConfigError, GenerationConfig};

/// One partition cell and the feature points inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Column index.
    pub x: u32,
    /// Row index.
    pub y: u32,
    /// Feature points, each inside `[origin, origin + cell_size)`.
    pub points: Vec<DVec2>,
}

/// The full `columns × rows` grid of cells for one generation request.
///
/// Never mutated after construction, so it can be shared by reference between
/// any number of sampling threads.
#[derive(Clone, Debug)]
pub struct FeaturePointField {
    columns: u32,
    rows: u32,
    domain: DVec2,
    cell_size: DVec2,
    /// Row-major.
    cells: Vec<Cell>,
}

impl FeaturePointField {
    /// Scatter feature points over the domain described by `config`.
    ///
    /// Cells are visited in row-major order; each draws a point count from
    /// `[0, max_points_per_cell)` and then two unit values per point. All
    /// draws come from a single ChaCha8 stream, so equal seeds give equal
    /// fields bit-for-bit.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn build(config: &GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        let (columns, rows) = config.grid_divisions;
        let cell_size = config.cell_size();
        let mut cells = Vec::with_capacity(config.cell_count());

        for y in 0..rows {
            for x in 0..columns {
                let origin = DVec2::new(f64::from(x), f64::from(y)) * cell_size;
                let count = if config.max_points_per_cell == 0 {
                    0
                } else {
                    rng.random_range(0..config.max_points_per_cell)
                };

                let points = (0..count)
                    .map(|_| {
                        let u: f64 = rng.random();
                        let v: f64 = rng.random();
                        origin + DVec2::new(u, v) * cell_size
                    })
                    .collect();

                cells.push(Cell { x, y, points });
            }
        }

        let field = Self {
            columns,
            rows,
            domain: config.domain(),
            cell_size,
            cells,
        };
        tracing::debug!(
            columns,
            rows,
            points = field.point_count(),
            "built feature point field"
        );
        Ok(field)
    }

    /// Build a field from an explicit point layout, one `Vec` per cell in
    /// row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CellCountMismatch`] if `points` does not have
    /// exactly one entry per cell, [`ConfigError::PointOutsideCell`] if a
    /// point lies outside its cell, or any validation error of `config`.
    pub fn from_cells(
        config: &GenerationConfig,
        points: Vec<Vec<DVec2>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let expected = config.cell_count();
        if points.len() != expected {
            return Err(ConfigError::CellCountMismatch {
                expected,
                actual: points.len(),
            });
        }

        let (columns, rows) = config.grid_divisions;
        let cell_size = config.cell_size();
        let mut cells = Vec::with_capacity(expected);

        for (index, cell_points) in points.into_iter().enumerate() {
            let x = (index % columns as usize) as u32;
            let y = (index / columns as usize) as u32;
            let min = DVec2::new(f64::from(x), f64::from(y)) * cell_size;
            let max = min + cell_size;

            if let Some(outside) = cell_points
                .iter()
                .find(|p| p.x < min.x || p.y < min.y || p.x >= max.x || p.y >= max.y)
            {
                return Err(ConfigError::PointOutsideCell {
                    cell_x: x,
                    cell_y: y,
                    x: outside.x,
                    y: outside.y,
                });
            }

            cells.push(Cell {
                x,
                y,
                points: cell_points,
            });
        }

        Ok(Self {
            columns,
            rows,
            domain: config.domain(),
            cell_size,
            cells,
        })
    }

    /// Number of cell columns.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Size of the sampling domain.
    pub fn domain_size(&self) -> DVec2 {
        self.domain
    }

    /// Size of one cell.
    pub fn cell_size(&self) -> DVec2 {
        self.cell_size
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the grid.
    pub fn cell(&self, x: u32, y: u32) -> &Cell {
        assert!(
            x < self.columns && y < self.rows,
            "cell ({x}, {y}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        &self.cells[y as usize * self.columns as usize + x as usize]
    }

    /// Total number of feature points over all cells.
    pub fn point_count(&self) -> usize {
        self.cells.iter().map(|c| c.points.len()).sum()
    }

    /// Cell owning a point inside the domain, or `None` outside `[0, domain)`.
    ///
    /// Indices are `floor(point / domain * divisions)`, clamped to the last
    /// cell so rounding right below the upper edge cannot overflow the grid.
    pub fn cell_of(&self, point: DVec2) -> Option<(u32, u32)> {
        let inside = |v: f64, limit: f64| v >= 0.0 && v < limit;
        if !(inside(point.x, self.domain.x) && inside(point.y, self.domain.y)) {
            return None;
        }

        let x = (point.x / self.domain.x * f64::from(self.columns)).floor() as u32;
        let y = (point.y / self.domain.y * f64::from(self.rows)).floor() as u32;
        Some((x.min(self.columns - 1), y.min(self.rows - 1)))
    }

    /// Feature points of the 3×3 block of cells centered on `(x, y)`.
    ///
    /// Neighbors outside the grid are skipped rather than wrapped, so edge and
    /// corner cells see fewer candidates. Order is neighbor row, then neighbor
    /// column, then insertion order within a cell.
    pub fn neighborhood(&self, x: u32, y: u32) -> impl Iterator<Item = &DVec2> + '_ {
        let columns = self.columns;
        let rows = self.rows;
        let xs = x.saturating_sub(1)..=(x + 1).min(columns - 1);
        let ys = y.saturating_sub(1)..=(y + 1).min(rows - 1);

        ys.flat_map(move |cy| xs.clone().map(move |cx| (cx, cy)))
            .flat_map(move |(cx, cy)| {
                self.cells[cy as usize * columns as usize + cx as usize]
                    .points
                    .iter()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> GenerationConfig {
        GenerationConfig {
            domain_size: (100.0, 60.0),
            grid_divisions: (5, 3),
            max_points_per_cell: 6,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = FeaturePointField::build(&seeded(42)).unwrap();
        let b = FeaturePointField::build(&seeded(42)).unwrap();
        assert_eq!(a.cells(), b.cells(), "Same seed must reproduce the field");
    }

    #[test]
    fn test_different_seed_different_field() {
        let a = FeaturePointField::build(&seeded(1)).unwrap();
        let b = FeaturePointField::build(&seeded(2)).unwrap();
        assert_ne!(a.cells(), b.cells());
    }

    #[test]
    fn test_points_lie_inside_their_cell() {
        let field = FeaturePointField::build(&seeded(9)).unwrap();
        let size = field.cell_size();
        for cell in field.cells() {
            let min = DVec2::new(cell.x as f64, cell.y as f64) * size;
            let max = min + size;
            for p in &cell.points {
                assert!(
                    p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y,
                    "point {p} escaped cell ({}, {})",
                    cell.x,
                    cell.y
                );
                assert_eq!(field.cell_of(*p), Some((cell.x, cell.y)));
            }
        }
    }

    #[test]
    fn test_point_count_is_bounded() {
        let config = seeded(3);
        let field = FeaturePointField::build(&config).unwrap();
        assert_eq!(field.cells().len(), 15);
        for cell in field.cells() {
            assert!(cell.points.len() < config.max_points_per_cell as usize);
        }
    }

    #[test]
    fn test_zero_max_points_gives_empty_field() {
        let config = GenerationConfig {
            max_points_per_cell: 0,
            ..seeded(5)
        };
        let field = FeaturePointField::build(&config).unwrap();
        assert_eq!(field.point_count(), 0);
    }

    #[test]
    fn test_unseeded_builds() {
        let config = GenerationConfig {
            seed: None,
            ..seeded(0)
        };
        let field = FeaturePointField::build(&config).unwrap();
        assert_eq!(field.cells().len(), config.cell_count());
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = GenerationConfig {
            grid_divisions: (0, 1),
            ..Default::default()
        };
        assert!(FeaturePointField::build(&config).is_err());
    }

    #[test]
    fn test_cell_of_edges() {
        let field = FeaturePointField::build(&seeded(0)).unwrap();
        assert_eq!(field.cell_of(DVec2::new(0.0, 0.0)), Some((0, 0)));
        assert_eq!(field.cell_of(DVec2::new(99.999, 59.999)), Some((4, 2)));
        assert_eq!(field.cell_of(DVec2::new(100.0, 10.0)), None);
        assert_eq!(field.cell_of(DVec2::new(-0.001, 10.0)), None);
        assert_eq!(field.cell_of(DVec2::new(f64::NAN, 10.0)), None);
    }

    #[test]
    fn test_neighborhood_is_clipped_at_edges() {
        let config = GenerationConfig {
            domain_size: (3.0, 3.0),
            grid_divisions: (3, 3),
            ..Default::default()
        };
        // One point per cell, at the cell center.
        let points = (0..9)
            .map(|i| vec![DVec2::new((i % 3) as f64 + 0.5, (i / 3) as f64 + 0.5)])
            .collect();
        let field = FeaturePointField::from_cells(&config, points).unwrap();

        assert_eq!(field.neighborhood(1, 1).count(), 9);
        assert_eq!(field.neighborhood(0, 0).count(), 4);
        assert_eq!(field.neighborhood(2, 1).count(), 6);

        let order: Vec<_> = field.neighborhood(0, 0).copied().collect();
        assert_eq!(
            order,
            vec![
                DVec2::new(0.5, 0.5),
                DVec2::new(1.5, 0.5),
                DVec2::new(0.5, 1.5),
                DVec2::new(1.5, 1.5),
            ]
        );
    }

    #[test]
    fn test_from_cells_validates_layout() {
        let config = GenerationConfig {
            domain_size: (2.0, 1.0),
            grid_divisions: (2, 1),
            ..Default::default()
        };

        assert_eq!(
            FeaturePointField::from_cells(&config, vec![vec![]]).unwrap_err(),
            ConfigError::CellCountMismatch {
                expected: 2,
                actual: 1
            }
        );

        let misplaced = vec![vec![DVec2::new(1.5, 0.5)], vec![]];
        assert!(matches!(
            FeaturePointField::from_cells(&config, misplaced),
            Err(ConfigError::PointOutsideCell {
                cell_x: 0,
                cell_y: 0,
                ..
            })
        ));
    }
}
