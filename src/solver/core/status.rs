// ---------------------------------
// Engine state machine
// ---------------------------------

/// Internal state of a homotopy engine.
///
/// A solution may only be read in the `AuxiliaryQPSolved`,
/// `HomotopyQPSolved` and `Solved` states.

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum QPStatus {
    /// Engine constructed or reset, no data loaded.
    #[default]
    NotInitialised,
    /// Auxiliary QP and its working set are being assembled.
    PreparingAuxiliaryQP,
    /// The auxiliary QP has been set up and is solved by construction.
    AuxiliaryQPSolved,
    /// A homotopy is in progress.
    PerformingHomotopy,
    /// An intermediate QP on the homotopy path is solved.
    HomotopyQPSolved,
    /// The target QP is solved.
    Solved,
}

impl QPStatus {
    pub fn has_solution(&self) -> bool {
        matches!(
            *self,
            QPStatus::AuxiliaryQPSolved | QPStatus::HomotopyQPSolved | QPStatus::Solved
        )
    }
}

impl std::fmt::Display for QPStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ---------------------------------
// Homotopy outcomes
// ---------------------------------

/// Outcome of an `init` or `hotstart` call.
///
/// These are expected results of a homotopy, not errors.  All
/// outcomes other than `Solved` leave the engine at the last
/// iterate reached, which remains a valid warm start.

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
pub enum SolverStatus {
    /// No homotopy has been run.
    #[default]
    Unsolved,
    /// The target QP was solved.
    Solved,
    /// Iteration limit reached before reaching the target QP.
    MaxIterations,
    /// Time limit reached before reaching the target QP.
    MaxTime,
    /// The target QP (or its bound data) is infeasible.
    Infeasible,
    /// The target QP is unbounded below.
    Unbounded,
    /// Cycling detected while restoring linear independence of the working set.
    CyclingDetected,
    /// Engine stopped after a numerical failure that regularisation could not repair.
    NumericalError,
}

impl SolverStatus {
    pub fn is_solved(&self) -> bool {
        matches!(*self, SolverStatus::Solved)
    }

    /// Budget exhaustion; calling `hotstart` again continues the homotopy.
    pub fn is_resumable(&self) -> bool {
        matches!(*self, SolverStatus::MaxIterations | SolverStatus::MaxTime)
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(
            *self,
            SolverStatus::Infeasible | SolverStatus::CyclingDetected
        )
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Structure of the Hessian, either supplied by the caller as a hint
/// or detected from the data.

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HessianType {
    Zero,
    Identity,
    PositiveDefinite,
    /// positive definite on the null space of the equality constraints
    PositiveDefiniteNullspace,
    Semidefinite,
    Indefinite,
    #[default]
    Unknown,
}

impl std::fmt::Display for HessianType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
