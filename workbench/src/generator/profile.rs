use anyhow::{bail, Context};
use matrixcore::{Matrix, MatrixMath};
use ndarray::Array2;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Declarative description of a workflow input matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatrixSpec {
    Rows {
        values: Vec<Vec<f64>>,
    },
    /// `true` becomes `1.0`, `false` becomes `-1.0`.
    BoolRows {
        values: Vec<Vec<bool>>,
    },
    Row {
        values: Vec<f64>,
    },
    Column {
        values: Vec<f64>,
    },
    Zeros {
        rows: usize,
        cols: usize,
    },
    Identity {
        size: usize,
    },
    Packed {
        rows: usize,
        cols: usize,
        values: Vec<f64>,
        #[serde(default)]
        start: usize,
    },
    /// Uniform values in `[min, max)`; a seed makes the draw reproducible.
    Random {
        rows: usize,
        cols: usize,
        #[serde(default = "default_min")]
        min: f64,
        #[serde(default = "default_max")]
        max: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
}

fn default_min() -> f64 {
    -1.0
}

fn default_max() -> f64 {
    1.0
}

fn bool_grid(values: &[Vec<bool>]) -> anyhow::Result<Array2<bool>> {
    let rows = values.len();
    let cols = values.first().map_or(0, Vec::len);
    if let Some(index) = values.iter().position(|row| row.len() != cols) {
        bail!(
            "boolean row {} has {} columns but row 0 has {}",
            index,
            values[index].len(),
            cols
        );
    }
    let flat: Vec<bool> = values.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows, cols), flat).context("shaping boolean grid")
}

/// Builds the matrix described by `spec`.
pub fn build_matrix(spec: &MatrixSpec) -> anyhow::Result<Matrix> {
    let matrix = match spec {
        MatrixSpec::Rows { values } => Matrix::from_rows(values)?,
        MatrixSpec::BoolRows { values } => Matrix::from_bool_array(bool_grid(values)?.view()),
        MatrixSpec::Row { values } => Matrix::create_row_matrix(values)?,
        MatrixSpec::Column { values } => Matrix::create_column_matrix(values)?,
        MatrixSpec::Zeros { rows, cols } => Matrix::try_new(*rows, *cols)?,
        MatrixSpec::Identity { size } => MatrixMath::identity(*size)?,
        MatrixSpec::Packed {
            rows,
            cols,
            values,
            start,
        } => {
            let mut matrix = Matrix::try_new(*rows, *cols)?;
            matrix.from_packed_array(values, *start)?;
            matrix
        }
        MatrixSpec::Random {
            rows,
            cols,
            min,
            max,
            seed,
        } => {
            let mut matrix = Matrix::try_new(*rows, *cols)?;
            match seed {
                Some(seed) => {
                    matrix.randomize_with(&mut StdRng::seed_from_u64(*seed), *min, *max)?
                }
                None => matrix.randomize(*min, *max)?,
            }
            matrix
        }
    };
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_literal_rows() {
        let spec = MatrixSpec::Rows {
            values: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        };
        let m = build_matrix(&spec).unwrap();
        assert_eq!(m.to_packed_array(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn builds_bool_rows_as_signed_units() {
        let spec = MatrixSpec::BoolRows {
            values: vec![vec![true, false, true]],
        };
        let m = build_matrix(&spec).unwrap();
        assert_eq!(m.to_packed_array(), vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn rejects_ragged_bool_rows() {
        let spec = MatrixSpec::BoolRows {
            values: vec![vec![true], vec![true, false]],
        };
        assert!(build_matrix(&spec).is_err());
    }

    #[test]
    fn packed_spec_skips_to_start() {
        let spec = MatrixSpec::Packed {
            rows: 1,
            cols: 2,
            values: vec![0.0, 5.0, 6.0],
            start: 1,
        };
        let m = build_matrix(&spec).unwrap();
        assert_eq!(m.to_packed_array(), vec![5.0, 6.0]);
    }

    #[test]
    fn seeded_random_spec_is_reproducible() {
        let spec = MatrixSpec::Random {
            rows: 4,
            cols: 2,
            min: 0.0,
            max: 2.0,
            seed: Some(13),
        };
        let a = build_matrix(&spec).unwrap();
        let b = build_matrix(&spec).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
        assert_eq!(a.shape(), (4, 2));
    }

    #[test]
    fn oversized_zeros_spec_fails() {
        let spec = MatrixSpec::Zeros {
            rows: usize::MAX,
            cols: 2,
        };
        assert!(build_matrix(&spec).is_err());
    }

    #[test]
    fn identity_spec_of_zero_fails() {
        assert!(build_matrix(&MatrixSpec::Identity { size: 0 }).is_err());
    }
}
