//! hotqp solver main module.
//!
//! The solver comes with three engines of increasing generality:
//!
//! * [`BoundedQP`] for QPs with simple bounds only,
//! * [`ConstrainedQP`] for QPs with general linear constraints,
//! * [`VaryingQP`] for sequences in which the Hessian and the
//!   constraint matrix change as well.
//!
//! All of them are driven the same way.  `init` solves the first QP of
//! a sequence, each `hotstart` then moves the solution along a straight
//! line in the data space to the next QP, changing the working set one
//! index at a time.

pub(crate) const INFINITY_DEFAULT: f64 = 1e20;

// internal module structure
pub(crate) mod core;
pub mod implementations;
pub(crate) mod utils;
pub mod workingset;

//Here we expose only part of the solver internals
//and rearrange public modules a bit to give a more
//user friendly API

pub use crate::solver::utils::infbounds::*;

pub use crate::solver::core::callbacks;
pub use crate::solver::core::{
    ConstraintProduct, HessianType, InitialGuess, KKTViolation, PrintLevel, QPError, QPInfo,
    QPSettings, QPSettingsBuilder, QPSettingsBuilderError, QPSolveResult, QPStatus,
    SettingsError, SolveBudget, SolverStatus,
};

pub use crate::solver::workingset::{SubjectToStatus, SubjectToType};

pub use crate::solver::implementations::bounded::BoundedQP;
pub use crate::solver::implementations::constrained::{ConstrainedQP, QPProblem};
pub use crate::solver::implementations::varying::VaryingQP;

#[cfg(feature = "serde")]
pub use crate::solver::implementations::QPData;
