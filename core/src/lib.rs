//! Dense 2-D matrix value type with validated element access and a
//! companion set of elementwise and linear-algebra operations.
//!
//! Every write into a [`Matrix`] rejects NaN and infinities, every index is
//! bounds-checked, and every [`MatrixMath`] operation returns a fresh matrix
//! without touching its inputs.

pub mod math;
pub mod prelude;
pub mod telemetry;

pub use math::{Matrix, MatrixMath};
pub use prelude::{MatrixError, MatrixResult, DEFAULT_PRECISION};
