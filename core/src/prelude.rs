/// Number of decimal digits used by [`crate::math::Matrix::equals`].
pub const DEFAULT_PRECISION: i32 = 10;

/// Common error type for matrix construction, access and arithmetic.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("index out of range: {0}")]
    OutOfRange(String),
    #[error("trying to assign invalid number to matrix: {0}")]
    InvalidValue(f64),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type MatrixResult<T> = Result<T, MatrixError>;

/// Rejects values that may never be stored in a matrix.
pub(crate) fn ensure_finite(value: f64) -> MatrixResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MatrixError::InvalidValue(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        assert_eq!(ensure_finite(1.5), Ok(1.5));
        assert!(matches!(
            ensure_finite(f64::INFINITY),
            Err(MatrixError::InvalidValue(v)) if v == f64::INFINITY
        ));
        assert!(matches!(
            ensure_finite(f64::NEG_INFINITY),
            Err(MatrixError::InvalidValue(_))
        ));
        assert!(matches!(
            ensure_finite(f64::NAN),
            Err(MatrixError::InvalidValue(v)) if v.is_nan()
        ));
    }

    #[test]
    fn errors_render_their_cause() {
        let err = MatrixError::OutOfRange("the row 3 is out of range: 3".into());
        assert_eq!(err.to_string(), "index out of range: the row 3 is out of range: 3");
    }
}
