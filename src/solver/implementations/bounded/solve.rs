use super::*;
use crate::timers::*;

impl<T> BoundedQP<T>
where
    T: FloatT,
{
    /// Solves the first QP of a sequence, starting from `x = 0` and the
    /// default bound working set.
    ///
    /// `H` may be omitted when the Hessian type has been set to `Zero`
    /// or `Identity`.  Absent bounds are infinite.
    pub fn init(
        &mut self,
        H: Option<&Matrix<T>>,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        budget: SolveBudget,
    ) -> Result<QPSolveResult, QPError> {
        self.init_with_guess(H, g, lb, ub, &InitialGuess::default(), budget)
    }

    /// Solves the first QP of a sequence, starting from a guessed
    /// primal-dual point and working set.
    pub fn init_with_guess(
        &mut self,
        H: Option<&Matrix<T>>,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        guess: &InitialGuess<T>,
        budget: SolveBudget,
    ) -> Result<QPSolveResult, QPError> {
        if self.core.status != QPStatus::NotInitialised {
            self.core
                .print_warning("engine already initialised, resetting before init");
            self.reset();
        }
        let time_budget = self.core.start_budget(&budget);
        self.core.timers.reset();
        self.core.status = QPStatus::PreparingAuxiliaryQP;

        let setup;
        timeit! {self.core.timers => "setup"; {
            setup = self.setup_auxiliary_qp(H, g, lb, ub, guess);
        }}
        if let Err(e) = setup {
            self.core.status = QPStatus::NotInitialised;
            return Err(e);
        }
        self.core.status = QPStatus::AuxiliaryQPSolved;
        self.core.print_header("BoundedQP");

        let result;
        timeit! {self.core.timers => "homotopy"; {
            result = solve_homotopy(self, &budget, time_budget);
        }}
        result
    }

    /// Solves the next QP of the sequence, starting from the current
    /// solution and working set.
    ///
    /// On `Infeasible` the iterate solves the last QP reached on the
    /// homotopy path, not the requested one.
    pub fn hotstart(
        &mut self,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        budget: SolveBudget,
    ) -> Result<QPSolveResult, QPError> {
        self.core.require_initialised()?;
        let time_budget = self.core.start_budget(&budget);

        self.core.load_bound_targets(&mut self.work, g, lb, ub)?;
        self.core.update_bound_types(&self.work);

        let result;
        timeit! {self.core.timers => "homotopy"; {
            result = solve_homotopy(self, &budget, time_budget);
        }}
        result
    }

    /// Solves the next QP of the sequence from the current solution,
    /// after replacing the working set by `bounds`.
    ///
    /// The current point is made optimal for the new working set by
    /// adjusting the current data, as done for the auxiliary QP of
    /// `init`.
    pub fn hotstart_with_working_set(
        &mut self,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        bounds: &[SubjectToStatus],
        budget: SolveBudget,
    ) -> Result<QPSolveResult, QPError> {
        self.core.require_initialised()?;
        let time_budget = self.core.start_budget(&budget);

        let guess = InitialGuess {
            bounds: Some(bounds),
            ..InitialGuess::default()
        };
        self.core.validate_statuses(&guess)?;
        self.core.load_bound_targets(&mut self.work, g, lb, ub)?;

        self.core.status = QPStatus::PreparingAuxiliaryQP;
        let setup = self.install_working_set(Some(bounds), GuessSource::default());
        if let Err(e) = setup {
            self.core.factor_stale = true;
            self.core.status = QPStatus::HomotopyQPSolved;
            return Err(e);
        }
        self.core.status = QPStatus::AuxiliaryQPSolved;

        let result;
        timeit! {self.core.timers => "homotopy"; {
            result = solve_homotopy(self, &budget, time_budget);
        }}
        result
    }

    fn setup_auxiliary_qp(
        &mut self,
        H: Option<&Matrix<T>>,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        guess: &InitialGuess<T>,
    ) -> Result<(), QPError> {
        let core = &mut self.core;
        core.load_hessian(H, core.hessian_hint)?;
        core.load_bound_targets(&mut self.work, g, lb, ub)?;
        let source = core.load_guess(guess)?;
        self.install_working_set(guess.bounds, source)
    }

    /// Rebuilds the bound working set and the factor around the current
    /// iterate, then sets up data for which the iterate is optimal.
    fn install_working_set(
        &mut self,
        explicit: Option<&[SubjectToStatus]>,
        source: GuessSource,
    ) -> Result<(), QPError> {
        let core = &mut self.core;
        core.bounds.reset();
        core.update_bound_types(&self.work);
        core.install_bound_statuses(&self.work, explicit, source)?;

        self.factorise_with_regularisation()?;

        let core = &mut self.core;
        core.setup_auxiliary_bounds(&self.work);
        core.gradient_from_multipliers();
        core.factor_stale = false;
        Ok(())
    }
}
