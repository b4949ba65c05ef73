use thiserror::Error;

/// Error type returned by dense factorization and triangular solve routines.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenseFactorizationError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Cholesky factorization broke down at the given pivot
    #[error("Cholesky factorization failed at pivot {0}")]
    Cholesky(usize),
    /// A triangular factor has a (numerically) zero diagonal entry
    #[error("Singular triangular factor at position {0}")]
    SingularFactor(usize),
}
