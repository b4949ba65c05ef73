use super::SolverStatus;
use crate::algebra::DenseFactorizationError;
use crate::solver::workingset::WorkingSetError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
    /// A field that can not be changed once data has been loaded
    #[error("Setting \"{0}\" can not be changed after initialisation")]
    ImmutableSetting(&'static str),
}

/// Error type returned by the QP engines.
///
/// Homotopy outcomes such as infeasibility or an exhausted iteration
/// budget are reported through [`SolverStatus`](crate::solver::SolverStatus),
/// not through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QPError {
    #[error("Engine constructed with zero variables")]
    ZeroDimension,
    #[error("Dimension mismatch in {name}: expected {expected}, got {actual}")]
    DimensionMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Engine has not been initialised")]
    NotInitialised,
    #[error("No solution available in the current engine state")]
    NotSolved,
    #[error("Hessian is not positive definite")]
    HessianNotPositiveDefinite,
    #[error("Hessian is indefinite")]
    HessianIndefinite,
    #[error("Index {index} out of bounds for dimension {size}")]
    IndexOutOfBounds { index: usize, size: usize },
    #[error("Working set corrupted: {0}")]
    WorkingSetCorrupted(&'static str),
    #[error("Factorization error: {0}")]
    Factorization(#[from] DenseFactorizationError),
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl From<WorkingSetError> for QPError {
    fn from(e: WorkingSetError) -> Self {
        QPError::WorkingSetCorrupted(e.describe())
    }
}

/// Early exit from inside a homotopy.  Either an ordinary outcome
/// that ends the current call, or an error.
#[derive(Debug)]
pub(crate) enum Halt {
    Stop(SolverStatus),
    Error(QPError),
}

impl From<QPError> for Halt {
    fn from(e: QPError) -> Self {
        Halt::Error(e)
    }
}

impl From<WorkingSetError> for Halt {
    fn from(e: WorkingSetError) -> Self {
        Halt::Error(e.into())
    }
}

impl From<DenseFactorizationError> for Halt {
    fn from(e: DenseFactorizationError) -> Self {
        Halt::Error(e.into())
    }
}

pub(crate) type HaltResult<V = ()> = Result<V, Halt>;

/// checks the length of a user supplied vector
pub(crate) fn check_dimension(
    name: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), QPError> {
    if expected != actual {
        Err(QPError::DimensionMismatch {
            name,
            expected,
            actual,
        })
    } else {
        Ok(())
    }
}
