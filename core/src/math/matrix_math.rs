use log::trace;

use crate::math::matrix::Matrix;
use crate::prelude::{MatrixError, MatrixResult};

/// Stateless operation set over [`Matrix`] values.
///
/// No operation mutates its inputs; every matrix-valued result is freshly
/// allocated and goes through the same finiteness check as
/// [`Matrix::set`], so an overflowing sum or a division by zero surfaces as
/// [`MatrixError::InvalidValue`].
pub struct MatrixMath;

impl MatrixMath {
    /// Elementwise `a + b`.
    pub fn add(a: &Matrix, b: &Matrix) -> MatrixResult<Matrix> {
        Self::ensure_same_shape(a, b)?;
        trace!("add {}x{} + {}x{}", a.rows(), a.cols(), b.rows(), b.cols());
        Self::zip_with(a, b, |x, y| x + y)
    }

    /// Elementwise `a - b`.
    pub fn subtract(a: &Matrix, b: &Matrix) -> MatrixResult<Matrix> {
        Self::ensure_same_shape(a, b)?;
        trace!("subtract {}x{} - {}x{}", a.rows(), a.cols(), b.rows(), b.cols());
        Self::zip_with(a, b, |x, y| x - y)
    }

    /// Scales every element by `value`.
    ///
    /// A non-finite `value` is not rejected up front; it fails when the
    /// first non-finite product is written into the result.
    pub fn multiply_scalar(matrix: &Matrix, value: f64) -> MatrixResult<Matrix> {
        trace!("scale {}x{} by {}", matrix.rows(), matrix.cols(), value);
        Self::map(matrix, |x| x * value)
    }

    /// Standard matrix product; `a.cols()` must equal `b.rows()`.
    pub fn multiply(a: &Matrix, b: &Matrix) -> MatrixResult<Matrix> {
        if a.cols() != b.rows() {
            return Err(MatrixError::DimensionMismatch(format!(
                "to multiply two matrices, the number of columns in the first matrix must \
                 match the number of rows in the second: {}x{} * {}x{}",
                a.rows(),
                a.cols(),
                b.rows(),
                b.cols()
            )));
        }
        trace!("multiply {}x{} * {}x{}", a.rows(), a.cols(), b.rows(), b.cols());

        let (lhs, rhs) = (a.as_slice(), b.as_slice());
        let shared = a.cols();
        let mut result = Vec::with_capacity(a.rows() * b.cols());
        for r in 0..a.rows() {
            for c in 0..b.cols() {
                let mut sum = 0.0;
                for i in 0..shared {
                    sum += lhs[r * shared + i] * rhs[i * b.cols() + c];
                }
                result.push(sum);
            }
        }
        Matrix::from_packed(a.rows(), b.cols(), &result)
    }

    /// Divides every element by `value`; dividing by zero fails on the
    /// resulting NaN or infinity.
    pub fn divide(matrix: &Matrix, value: f64) -> MatrixResult<Matrix> {
        trace!("divide {}x{} by {}", matrix.rows(), matrix.cols(), value);
        Self::map(matrix, |x| x / value)
    }

    /// `size x size` identity matrix.
    pub fn identity(size: usize) -> MatrixResult<Matrix> {
        if size < 1 {
            return Err(MatrixError::InvalidParameter(
                "size of identity matrix must be at least 1".into(),
            ));
        }
        let mut result = Matrix::new(size, size);
        for i in 0..size {
            result.set(i, i, 1.0)?;
        }
        Ok(result)
    }

    /// Dot product of two vectors over their packed values, so a row and a
    /// column vector of the same length combine.
    pub fn scalar(a: &Matrix, b: &Matrix) -> MatrixResult<f64> {
        if !a.is_vector() || !b.is_vector() {
            return Err(MatrixError::DimensionMismatch(format!(
                "to take scalar product, both matrices must be vectors: {}x{} and {}x{}",
                a.rows(),
                a.cols(),
                b.rows(),
                b.cols()
            )));
        }
        if a.size() != b.size() {
            return Err(MatrixError::DimensionMismatch(format!(
                "to take scalar product, both matrices must have the same length: {} and {}",
                a.size(),
                b.size()
            )));
        }
        trace!("scalar product of length {}", a.size());
        Ok(a
            .as_slice()
            .iter()
            .zip(b.as_slice())
            .map(|(x, y)| x * y)
            .sum())
    }

    fn ensure_same_shape(a: &Matrix, b: &Matrix) -> MatrixResult<()> {
        if a.rows() != b.rows() {
            return Err(MatrixError::DimensionMismatch(format!(
                "the matrices must have the same number of rows and columns; \
                 matrix A ({}x{}) has {} rows and matrix B ({}x{}) has {} rows",
                a.rows(),
                a.cols(),
                a.rows(),
                b.rows(),
                b.cols(),
                b.rows()
            )));
        }
        if a.cols() != b.cols() {
            return Err(MatrixError::DimensionMismatch(format!(
                "the matrices must have the same number of rows and columns; \
                 matrix A ({}x{}) has {} columns and matrix B ({}x{}) has {} columns",
                a.rows(),
                a.cols(),
                a.cols(),
                b.rows(),
                b.cols(),
                b.cols()
            )));
        }
        Ok(())
    }

    fn map<F>(matrix: &Matrix, f: F) -> MatrixResult<Matrix>
    where
        F: Fn(f64) -> f64,
    {
        let values: Vec<f64> = matrix.as_slice().iter().map(|&x| f(x)).collect();
        Matrix::from_packed(matrix.rows(), matrix.cols(), &values)
    }

    fn zip_with<F>(a: &Matrix, b: &Matrix, f: F) -> MatrixResult<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        let values: Vec<f64> = a
            .as_slice()
            .iter()
            .zip(b.as_slice())
            .map(|(&x, &y)| f(x, y))
            .collect();
        Matrix::from_packed(a.rows(), a.cols(), &values)
    }
}
