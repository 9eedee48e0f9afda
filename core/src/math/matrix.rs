//! Fixed-shape dense matrix of `f64` values.

use std::fmt;
use std::ops::Index;

use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::prelude::{ensure_finite, MatrixError, MatrixResult, DEFAULT_PRECISION};

/// A dense, row-major grid of finite `f64` values.
///
/// The shape is fixed at construction. Every write path rejects NaN and
/// infinities before touching the stored values, so a failed write leaves
/// the matrix exactly as it was.
///
/// ```
/// use matrixcore::Matrix;
///
/// let mut m = Matrix::new(2, 3);
/// m.set(1, 2, 4.5).unwrap();
/// assert_eq!(m.get(1, 2).unwrap(), 4.5);
/// assert!(m.set(0, 0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Creates a zero-filled matrix.
    ///
    /// Zero extents are accepted here; operations that need a non-empty
    /// matrix (such as [`crate::MatrixMath::identity`]) check for themselves.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`; use [`Matrix::try_new`]
    /// for a checked constructor.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::try_new(rows, cols).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Checked version of [`Matrix::new`].
    pub fn try_new(rows: usize, cols: usize) -> MatrixResult<Self> {
        let count = Self::element_count(rows, cols)?;
        Ok(Self {
            data: vec![0.0; count],
            rows,
            cols,
        })
    }

    fn element_count(rows: usize, cols: usize) -> MatrixResult<usize> {
        rows.checked_mul(cols).ok_or_else(|| {
            MatrixError::InvalidParameter(format!(
                "a {}x{} matrix has more elements than fit in memory",
                rows, cols
            ))
        })
    }

    /// Allocates a `rows x cols` matrix and fills it from a packed array.
    ///
    /// # Errors
    ///
    /// Fails if `values` does not hold exactly `rows * cols` elements or if
    /// any of them is NaN or infinite.
    pub fn from_packed(rows: usize, cols: usize, values: &[f64]) -> MatrixResult<Self> {
        let count = Self::element_count(rows, cols)?;
        if values.len() != count {
            return Err(MatrixError::DimensionMismatch(format!(
                "a {}x{} matrix needs {} packed values, got {}",
                rows,
                cols,
                count,
                values.len()
            )));
        }
        let mut matrix = Self::try_new(rows, cols)?;
        matrix.from_packed_array(values, 0)?;
        Ok(matrix)
    }

    /// Deep-copies a rectangular grid given as nested rows.
    ///
    /// # Errors
    ///
    /// Fails with [`MatrixError::DimensionMismatch`] on ragged input and with
    /// [`MatrixError::InvalidValue`] if any cell is NaN or infinite.
    pub fn from_rows(rows: &[Vec<f64>]) -> MatrixResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::DimensionMismatch(format!(
                    "row {} has {} columns but row 0 has {}",
                    index,
                    row.len(),
                    cols
                )));
            }
            for &value in row {
                data.push(ensure_finite(value)?);
            }
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Deep-copies an `ndarray` grid; the shape is taken from the view.
    pub fn from_array(source: ArrayView2<'_, f64>) -> MatrixResult<Self> {
        let data = source
            .iter()
            .map(|&value| ensure_finite(value))
            .collect::<MatrixResult<Vec<_>>>()?;
        Ok(Self {
            data,
            rows: source.nrows(),
            cols: source.ncols(),
        })
    }

    /// Maps a boolean grid to `+1.0` for `true` and `-1.0` for `false`.
    pub fn from_bool_array(source: ArrayView2<'_, bool>) -> Self {
        Self {
            data: source
                .iter()
                .map(|&flag| if flag { 1.0 } else { -1.0 })
                .collect(),
            rows: source.nrows(),
            cols: source.ncols(),
        }
    }

    /// Wraps `values` into a `1 x N` matrix.
    pub fn create_row_matrix(values: &[f64]) -> MatrixResult<Self> {
        Self::from_packed(1, values.len(), values)
    }

    /// Wraps `values` into an `N x 1` matrix.
    pub fn create_column_matrix(values: &[f64]) -> MatrixResult<Self> {
        Self::from_packed(values.len(), 1, values)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of elements, always `rows * cols`.
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major view of the stored values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn validate(&self, row: usize, col: usize) -> MatrixResult<()> {
        if row >= self.rows {
            return Err(MatrixError::OutOfRange(format!(
                "the row {} is out of range: {}",
                row, self.rows
            )));
        }
        if col >= self.cols {
            return Err(MatrixError::OutOfRange(format!(
                "the column {} is out of range: {}",
                col, self.cols
            )));
        }
        Ok(())
    }

    /// Reads the element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> MatrixResult<f64> {
        self.validate(row, col)?;
        Ok(self.data[self.offset(row, col)])
    }

    /// Writes the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Out-of-range indices and non-finite values are rejected before the
    /// matrix is modified.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> MatrixResult<()> {
        self.validate(row, col)?;
        let value = ensure_finite(value)?;
        let offset = self.offset(row, col);
        self.data[offset] = value;
        Ok(())
    }

    /// Sets every element to `0.0`.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Overwrites the matrix row-major from `values[start..]` and returns the
    /// index just past the last consumed element.
    ///
    /// # Errors
    ///
    /// Fails with [`MatrixError::OutOfRange`] if fewer than `size()` values
    /// are available from `start`, and with [`MatrixError::InvalidValue`] if
    /// any consumed value is not finite. The matrix is unchanged on error.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_packed_array(&mut self, values: &[f64], start: usize) -> MatrixResult<usize> {
        let end = start
            .checked_add(self.data.len())
            .filter(|&end| end <= values.len())
            .ok_or_else(|| {
                MatrixError::OutOfRange(format!(
                    "packed array of length {} cannot supply {} values from index {}",
                    values.len(),
                    self.data.len(),
                    start
                ))
            })?;
        let source = &values[start..end];
        if let Some(&bad) = source.iter().find(|value| !value.is_finite()) {
            return Err(MatrixError::InvalidValue(bad));
        }
        self.data.copy_from_slice(source);
        Ok(end)
    }

    /// Returns a freshly allocated row-major copy of the values.
    pub fn to_packed_array(&self) -> Vec<f64> {
        self.data.clone()
    }

    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows, self.cols), |(row, col)| {
            self.data[self.offset(row, col)]
        })
    }

    /// Copies one row into a `1 x cols` matrix.
    pub fn get_row(&self, row: usize) -> MatrixResult<Matrix> {
        if row >= self.rows {
            return Err(MatrixError::OutOfRange(format!(
                "can't get row {} because it doesn't exist (rows: {})",
                row, self.rows
            )));
        }
        let start = self.offset(row, 0);
        Ok(Self {
            data: self.data[start..start + self.cols].to_vec(),
            rows: 1,
            cols: self.cols,
        })
    }

    /// Copies one column into a `rows x 1` matrix.
    pub fn get_col(&self, col: usize) -> MatrixResult<Matrix> {
        if col >= self.cols {
            return Err(MatrixError::OutOfRange(format!(
                "can't get column {} because it doesn't exist (columns: {})",
                col, self.cols
            )));
        }
        Ok(Self {
            data: (0..self.rows)
                .map(|row| self.data[self.offset(row, col)])
                .collect(),
            rows: self.rows,
            cols: 1,
        })
    }

    /// True when the matrix has a single row or a single column, so `1 x 1`
    /// counts as a vector.
    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&value| value == 0.0)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Checks the squareness precondition for inversion.
    ///
    /// This is NOT an invertibility test: a singular square matrix still
    /// returns `true`. No inverse is provided by this crate.
    pub fn is_inversible(&self) -> bool {
        self.is_square()
    }

    /// Fills the matrix with uniform values in `[min, max)` drawn from the
    /// thread-local generator, which is seeded once per thread from the OS.
    pub fn randomize(&mut self, min: f64, max: f64) -> MatrixResult<()> {
        self.randomize_with(&mut rand::thread_rng(), min, max)
    }

    /// Same as [`Matrix::randomize`] with an explicit random source.
    ///
    /// # Errors
    ///
    /// Fails with [`MatrixError::InvalidValue`] if either bound is NaN or
    /// infinite; nothing is written in that case.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R, min: f64, max: f64) -> MatrixResult<()> {
        let (min, max) = (ensure_finite(min)?, ensure_finite(max)?);
        // No `max - min` here: it overflows for bounds near opposite extremes.
        let ceiling = below(max).max(min);
        let values = (0..self.data.len())
            .map(|_| {
                let u = rng.gen::<f64>();
                let value = u * max + (1.0 - u) * min;
                if min < max {
                    value.clamp(min, ceiling)
                } else {
                    value.clamp(max, min)
                }
            })
            .collect();
        self.data = values;
        Ok(())
    }

    /// Precision-10 equality, see [`Matrix::equals_with_precision`].
    pub fn equals(&self, other: &Matrix) -> bool {
        self.compare(other, 10f64.powi(DEFAULT_PRECISION))
    }

    /// Compares two matrices after scaling every element by
    /// `10^precision` and truncating toward zero.
    ///
    /// Truncation puts `0.11` and `0.19` in the same bucket at precision 1,
    /// while `0.16` and `0.24` land in different ones. Matrices of different
    /// shapes are never equal.
    ///
    /// # Errors
    ///
    /// Fails with [`MatrixError::InvalidParameter`] for a negative precision
    /// or one whose scale factor overflows `f64`.
    pub fn equals_with_precision(&self, other: &Matrix, precision: i32) -> MatrixResult<bool> {
        if precision < 0 {
            return Err(MatrixError::InvalidParameter(
                "precision can't be a negative number".into(),
            ));
        }
        let scale = 10f64.powi(precision);
        if !scale.is_finite() {
            return Err(MatrixError::InvalidParameter(format!(
                "precision of {} decimal places is not supported",
                precision
            )));
        }
        Ok(self.compare(other, scale))
    }

    fn compare(&self, other: &Matrix, scale: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| {
                    let (scaled_a, scaled_b) = (a * scale, b * scale);
                    if scaled_a.is_finite() && scaled_b.is_finite() {
                        scaled_a.trunc() == scaled_b.trunc()
                    } else {
                        // an overflowing product means the value is already integral
                        a == b
                    }
                })
    }
}

/// Largest `f64` strictly below a finite `value`.
fn below(value: f64) -> f64 {
    if value == 0.0 {
        -f64::from_bits(1)
    } else if value > 0.0 {
        f64::from_bits(value.to_bits() - 1)
    } else {
        f64::from_bits(value.to_bits() + 1)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    /// # Panics
    ///
    /// Panics if either index is out of range; use [`Matrix::get`] for a
    /// checked read.
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[self.offset(row, col)]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.data[self.offset(row, col)])?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
