//! Square input matrix with bounded values.
//!
//! A [`Matrix`] can only be built through validating constructors, so every
//! instance is square and every cell lies in `[0, MAX_VALUE]`. The counting
//! engine relies on this to index shards without bounds checks failing.

use rand::Rng;

use crate::error::{Error, Result};

/// Largest value a matrix cell may hold.
pub const MAX_VALUE: u32 = 1000;

/// An immutable `size x size` grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matrix {
    size: usize,
    cells: Vec<u32>,
}

impl Matrix {
    /// Build from a vector of rows. Every row must have `rows.len()` cells.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(Error::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            cells.extend(values);
        }
        Self::validate_values(size, &cells)?;
        Ok(Self { size, cells })
    }

    /// Build from a flat row-major buffer of `size * size` cells.
    pub fn from_cells(size: usize, cells: Vec<u32>) -> Result<Self> {
        let expected = size.checked_mul(size).unwrap_or(usize::MAX);
        if cells.len() != expected {
            return Err(Error::CellCountMismatch {
                size,
                expected,
                len: cells.len(),
            });
        }
        Self::validate_values(size, &cells)?;
        Ok(Self { size, cells })
    }

    /// Fill a `size x size` matrix with values drawn uniformly from `[0, MAX_VALUE]`.
    ///
    /// Fails with [`Error::MatrixTooLarge`] when `size * size` overflows.
    pub fn random<R: Rng>(size: usize, rng: &mut R) -> Result<Self> {
        let len = size
            .checked_mul(size)
            .ok_or(Error::MatrixTooLarge { size })?;
        let cells = (0..len).map(|_| rng.random_range(0..=MAX_VALUE)).collect();
        Ok(Self { size, cells })
    }

    fn validate_values(size: usize, cells: &[u32]) -> Result<()> {
        if let Some(idx) = cells.iter().position(|&v| v > MAX_VALUE) {
            return Err(Error::ValueOutOfRange {
                row: idx / size,
                col: idx % size,
                value: cells[idx],
                max: MAX_VALUE,
            });
        }
        Ok(())
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Borrow row `row`. Panics if `row >= size`.
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> &[u32] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// Cell at (`row`, `col`), or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col).copied()
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        // chunks_exact panics on a zero chunk size
        self.cells.chunks_exact(self.size.max(1))
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn from_rows_keeps_row_major_order() {
        let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(m.size(), 2);
        assert_eq!(m.row(0), &[1, 2]);
        assert_eq!(m.row(1), &[3, 4]);
        assert_eq!(m.get(1, 0), Some(3));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(
            err,
            Error::NotSquare {
                row: 1,
                len: 1,
                size: 2
            }
        ));
    }

    #[test]
    fn from_rows_rejects_values_above_max() {
        let err = Matrix::from_rows(vec![vec![1, 2], vec![3, MAX_VALUE + 1]]).unwrap_err();
        assert!(matches!(
            err,
            Error::ValueOutOfRange {
                row: 1,
                col: 1,
                value: 1001,
                ..
            }
        ));
    }

    #[test]
    fn max_value_is_accepted() {
        let m = Matrix::from_cells(1, vec![MAX_VALUE]).unwrap();
        assert_eq!(m.get(0, 0), Some(MAX_VALUE));
    }

    #[test]
    fn from_cells_checks_length() {
        let err = Matrix::from_cells(3, vec![0; 8]).unwrap_err();
        assert!(matches!(
            err,
            Error::CellCountMismatch {
                size: 3,
                expected: 9,
                len: 8
            }
        ));
    }

    #[test]
    fn empty_matrix_is_valid() {
        let m = Matrix::from_rows(Vec::new()).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.rows().count(), 0);
        let m = Matrix::from_cells(0, Vec::new()).unwrap();
        assert_eq!(m.size(), 0);
    }

    #[test]
    fn rows_iterates_every_row() {
        let m = Matrix::from_cells(3, (0..9).collect()).unwrap();
        let rows: Vec<&[u32]> = m.rows().collect();
        assert_eq!(rows, vec![&[0u32, 1, 2][..], &[3, 4, 5][..], &[6, 7, 8][..]]);
    }

    #[test]
    fn random_stays_in_range_and_is_seed_deterministic() {
        let a = Matrix::random(50, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = Matrix::random(50, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cells().len(), 2500);
        assert!(a.cells().iter().all(|&v| v <= MAX_VALUE));
    }

    #[test]
    fn random_rejects_overflowing_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let size = usize::MAX / 2;
        let err = Matrix::random(size, &mut rng).unwrap_err();
        assert!(matches!(err, Error::MatrixTooLarge { size: s } if s == size));
        assert!(Matrix::random(0, &mut rng).unwrap().is_empty());
    }
}
