use super::{QPStatus, SolverStatus};
use crate::algebra::*;
use crate::solver::workingset::SubjectToStatus;

/// Summary of the most recent `init` or `hotstart` call

#[derive(Default, Debug, Clone)]
pub struct QPInfo<T> {
    /// outcome of the last call
    pub status: SolverStatus,
    /// state of the engine after the last call
    pub qp_status: QPStatus,
    /// working set changes performed by the last call
    pub iterations: u32,
    /// working set changes since the last `init`
    pub total_iterations: u32,
    /// wall clock time of the last call (seconds)
    pub solve_time: f64,
    /// last homotopy step length
    pub tau: T,
    /// relative distance to the target data after the last step
    pub homotopy_length: T,
    /// objective value at the last iterate
    pub objective: T,
    pub n_free: usize,
    pub n_fixed: usize,
    pub n_active: usize,
    /// identity shift currently added to the Hessian
    pub regularisation: T,
}

impl<T> QPInfo<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Returned by `init` and `hotstart`

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QPSolveResult {
    pub status: SolverStatus,
    /// working set changes performed
    pub iterations: u32,
    /// wall clock time used (seconds)
    pub solve_time: f64,
}

/// Iteration and time budget of a single call.  Fields left as
/// `None` take their values from the engine settings.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveBudget {
    pub max_iter: Option<u32>,
    pub time_limit: Option<f64>,
}

impl SolveBudget {
    pub fn iterations(max_iter: u32) -> Self {
        Self {
            max_iter: Some(max_iter),
            time_limit: None,
        }
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }
}

/// Optional starting point for `init`.
///
/// The auxiliary QP is built so that the guess is its optimal
/// solution.  Statuses take precedence over the sign of `y`, which
/// takes precedence over the position of `x` relative to the bounds.

#[derive(Debug, Clone, Copy)]
pub struct InitialGuess<'a, T> {
    pub x: Option<&'a [T]>,
    pub y: Option<&'a [T]>,
    pub bounds: Option<&'a [SubjectToStatus]>,
    pub constraints: Option<&'a [SubjectToStatus]>,
}

impl<T> Default for InitialGuess<'_, T> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            bounds: None,
            constraints: None,
        }
    }
}

/// Violations of the optimality conditions at the current iterate

#[derive(Debug, Clone, Copy, Default)]
pub struct KKTViolation<T> {
    /// `max |H*x + g - A'*y_C - y_B|`
    pub stationarity: T,
    /// largest bound or constraint violation
    pub feasibility: T,
    /// largest multiplier of the wrong sign
    pub dual_sign: T,
    /// largest `|y_i * slack_i|`
    pub complementarity: T,
}

impl<T> KKTViolation<T>
where
    T: FloatT,
{
    pub fn max(&self) -> T {
        [
            self.stationarity,
            self.feasibility,
            self.dual_sign,
            self.complementarity,
        ]
        .maximum()
    }
}
