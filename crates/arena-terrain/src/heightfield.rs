//! Row-major scalar height buffer handed to the terrain consumer.

use serde::{Deserialize, Serialize};

/// Marks an output cell that has no usable height.
///
/// Normalized distances are never negative, so the sentinel cannot collide
/// with a computed value.
pub const SENTINEL: f64 = -1.0;

/// A `width × height` grid of normalized heights, row-major.
///
/// Deserialized input goes through [`Heightfield::from_vec`], so a buffer
/// whose length disagrees with its dimensions is rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHeightfield")]
pub struct Heightfield {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawHeightfield {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl TryFrom<RawHeightfield> for Heightfield {
    type Error = HeightfieldError;

    fn try_from(raw: RawHeightfield) -> Result<Self, Self::Error> {
        Self::from_vec(raw.width, raw.height, raw.values)
    }
}

/// Errors from building a [`Heightfield`] out of existing data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeightfieldError {
    /// `values` does not hold exactly `width * height` entries.
    #[error("{width}x{height} heightfield needs {} values, got {len}", width * height)]
    LengthMismatch {
        /// Declared columns.
        width: usize,
        /// Declared rows.
        height: usize,
        /// Values supplied.
        len: usize,
    },
}

/// Summary of the defined values of a [`Heightfield`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightfieldStats {
    /// Smallest defined value, `None` when every cell is the sentinel.
    pub min: Option<f64>,
    /// Largest defined value.
    pub max: Option<f64>,
    /// Mean of defined values.
    pub mean: Option<f64>,
    /// Number of sentinel cells.
    pub sentinel_count: usize,
}

impl Heightfield {
    /// A heightfield with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            values: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// [`HeightfieldError::LengthMismatch`] unless `values.len()` is
    /// `width * height`.
    pub fn from_vec(
        width: usize,
        height: usize,
        values: Vec<f64>,
    ) -> Result<Self, HeightfieldError> {
        if width.checked_mul(height) != Some(values.len()) {
            return Err(HeightfieldError::LengthMismatch {
                width,
                height,
                len: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// A completely flat heightfield at height zero.
    pub fn flat(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw value at `(x, y)`, sentinel included.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of range");
        self.values[y * self.width + x]
    }

    /// Height at `(x, y)`, or `None` if out of range or undefined.
    pub fn value(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let v = self.values[y * self.width + x];
        (!is_sentinel(v)).then_some(v)
    }

    /// One row of raw values.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[f64] {
        &self.values[y * self.width..(y + 1) * self.width]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on zero; an empty-width field has no rows worth yielding.
        self.values.chunks_exact(self.width.max(1))
    }

    /// All values, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Give up the buffer, row-major.
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Number of sentinel cells.
    pub fn sentinel_count(&self) -> usize {
        self.values.iter().filter(|v| is_sentinel(**v)).count()
    }

    /// Replace every sentinel with `value`, e.g. `0.0` to flatten holes.
    pub fn fill_sentinels(&mut self, value: f64) {
        for v in &mut self.values {
            if is_sentinel(*v) {
                *v = value;
            }
        }
    }

    /// Min, max and mean over defined values.
    pub fn stats(&self) -> HeightfieldStats {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut defined = 0usize;

        for &v in self.values.iter().filter(|v| !is_sentinel(**v)) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            defined += 1;
        }

        let any = defined > 0;
        HeightfieldStats {
            min: any.then_some(min),
            max: any.then_some(max),
            mean: any.then(|| sum / defined as f64),
            sentinel_count: self.values.len() - defined,
        }
    }
}

/// `true` if `value` is the undefined-sample marker.
#[inline]
pub fn is_sentinel(value: f64) -> bool {
    value == SENTINEL
}
