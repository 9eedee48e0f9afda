pub mod matrix;
pub mod matrix_math;

pub use matrix::Matrix;
pub use matrix_math::MatrixMath;
