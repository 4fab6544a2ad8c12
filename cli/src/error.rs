//! Error handling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid matrix file: {0}")]
    MatrixFile(String),

    #[error("Matrix is not invertible (no pivot in column {column})")]
    NotInvertible { column: usize },

    #[error("Vector must be {expected} bytes, got {actual}")]
    VectorLength { expected: usize, actual: usize },

    #[error("Matrix times its inverse is not the identity")]
    NotIdentity,

    #[error("Self-test failed on {failed} of {samples} vectors")]
    Verification { failed: usize, samples: usize },
}
