use super::*;
use crate::timers::*;

impl<T> ConstrainedQP<T>
where
    T: FloatT,
{
    /// Solves the first QP of a sequence, starting from `x = 0`, the
    /// default bound working set and no active constraints.
    ///
    /// `H` may be omitted when the Hessian type has been set to `Zero`
    /// or `Identity`.  Absent bounds are infinite.  As for
    /// [`hotstart`](Self::hotstart), an `Infeasible` result leaves the
    /// iterate at the last QP reached on the homotopy path.
    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        H: Option<&Matrix<T>>,
        g: &[T],
        A: &Matrix<T>,
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        lbA: Option<&[T]>,
        ubA: Option<&[T]>,
        budget: SolveBudget,
    ) -> Result<QPSolveResult, QPError> {
        let data = QPProblem { H, g, A, lb, ub, lbA, ubA };
        self.init_with_guess(&data, &InitialGuess::default(), budget)
    }

    /// Solves the first QP of a sequence, starting from a guessed
    /// primal-dual point and working set.  Guessed constraints that
    /// are linearly dependent on the rest of the working set stay
    /// inactive.
    pub fn init_with_guess(
        &mut self,
        data: &QPProblem<T>,
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
            setup = self.setup_auxiliary_qp(data, guess);
        }}
        if let Err(e) = setup {
            self.core.status = QPStatus::NotInitialised;
            return Err(e);
        }
        self.core.status = QPStatus::AuxiliaryQPSolved;
        self.core.print_header("ConstrainedQP");

        let result;
        timeit! {self.core.timers => "homotopy"; {
            result = solve_homotopy(self, &budget, time_budget);
        }}
        result
    }

    /// Solves the next QP of the sequence, starting from the current
    /// solution and working set.  `H` and `A` are kept.
    ///
    /// When the status is `Infeasible` the iterate is the solution of
    /// the last QP reached on the homotopy path.  It may violate the
    /// bounds and constraints of the requested QP.
    pub fn hotstart(
        &mut self,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        lbA: Option<&[T]>,
        ubA: Option<&[T]>,
        budget: SolveBudget,
    ) -> Result<QPSolveResult, QPError> {
        self.core.require_initialised()?;
        let time_budget = self.core.start_budget(&budget);
        self.load_targets(g, lb, ub, lbA, ubA)?;

        let result;
        timeit! {self.core.timers => "homotopy"; {
            result = solve_homotopy(self, &budget, time_budget);
        }}
        result
    }

    /// Solves the next QP of the sequence from the current solution,
    /// after replacing the working set.  Disabled constraints stay
    /// disabled.
    #[allow(clippy::too_many_arguments)]
    pub fn hotstart_with_working_set(
        &mut self,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        lbA: Option<&[T]>,
        ubA: Option<&[T]>,
        bounds: &[SubjectToStatus],
        constraints: &[SubjectToStatus],
        budget: SolveBudget,
    ) -> Result<QPSolveResult, QPError> {
        self.core.require_initialised()?;
        let time_budget = self.core.start_budget(&budget);

        let guess = InitialGuess {
            bounds: Some(bounds),
            constraints: Some(constraints),
            ..InitialGuess::default()
        };
        self.core.validate_statuses(&guess)?;
        self.load_targets(g, lb, ub, lbA, ubA)?;

        self.core.status = QPStatus::PreparingAuxiliaryQP;
        let setup = self.install_working_set(Some(bounds), Some(constraints), GuessSource::default());
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

    /// Loads target data of a hotstart and classifies bounds and
    /// constraints against it.
    pub(crate) fn load_targets(
        &mut self,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        lbA: Option<&[T]>,
        ubA: Option<&[T]>,
    ) -> Result<(), QPError> {
        let core = &mut self.core;
        core.load_bound_targets(&mut self.work, g, lb, ub)?;
        self.block.load_targets(&mut self.work, lbA, ubA, core.inf)?;
        core.update_bound_types(&self.work);
        self.block.update_types(&self.work, &core.settings, core.inf);
        Ok(())
    }

    fn setup_auxiliary_qp(&mut self, data: &QPProblem<T>, guess: &InitialGuess<T>) -> Result<(), QPError> {
        let core = &mut self.core;
        core.load_hessian(data.H, core.hessian_hint)?;
        self.block.load_matrix(data.A)?;
        self.load_targets(data.g, data.lb, data.ub, data.lbA, data.ubA)?;
        let source = self.core.load_guess(guess)?;
        self.install_working_set(guess.bounds, guess.constraints, source)
    }

    /// Installs a working set around the current iterate, then sets up
    /// data for which the iterate is optimal.  Bound and constraint
    /// types must describe the target data.
    pub(crate) fn install_working_set(
        &mut self,
        bounds: Option<&[SubjectToStatus]>,
        constraints: Option<&[SubjectToStatus]>,
        source: GuessSource,
    ) -> Result<(), QPError> {
        self.rebuild_working_set(bounds, constraints, source)?;
        self.setup_auxiliary_data();
        self.core.factor_stale = false;
        Ok(())
    }

    /// Rebuilds the working set, the TQ factorisation and the factor of
    /// the projected Hessian from scratch.  The data is left untouched.
    pub(crate) fn rebuild_working_set(
        &mut self,
        bounds: Option<&[SubjectToStatus]>,
        constraints: Option<&[SubjectToStatus]>,
        source: GuessSource,
    ) -> Result<(), QPError> {
        let core = &mut self.core;
        core.bounds.reset();
        core.update_bound_types(&self.work);
        core.install_bound_statuses(&self.work, bounds, source)?;

        self.release_constraints()?;
        self.setup_tq();
        self.block.update_products(&self.core.x);
        self.install_constraint_statuses(constraints, source)?;

        self.factorise_projected_with_regularisation()
    }

    /// Makes every enabled constraint inactive
    pub(crate) fn release_constraints(&mut self) -> Result<(), QPError> {
        let block = &mut self.block;
        for j in 0..block.m {
            match block.constraints.get_status(j) {
                SubjectToStatus::Disabled | SubjectToStatus::Inactive => {}
                _ => block.constraints.set_status(j, SubjectToStatus::Inactive)?,
            }
        }
        block.disabling_side.fill(SubjectToStatus::Inactive);
        Ok(())
    }

    /// Activates guessed constraints one by one, skipping those that
    /// are linearly dependent on the working set built so far.
    fn install_constraint_statuses(
        &mut self,
        explicit: Option<&[SubjectToStatus]>,
        source: GuessSource,
    ) -> Result<(), QPError> {
        let n = self.core.n;
        for j in 0..self.block.m {
            if !self.block.is_enabled(j) {
                continue;
            }
            let status = guess_status(
                self.block.constraints.get_type(j),
                (self.work.lbA_target[j], self.work.ubA_target[j]),
                explicit.map(|s| s[j]),
                source.y.then(|| self.core.y[n + j]),
                source.x.then(|| self.block.Ax[j]),
                SubjectToStatus::Inactive,
                self.core.inf,
                self.core.settings.bound_tolerance,
            );
            if !status.is_active() {
                continue;
            }
            if self.constraint_is_independent(j) {
                self.setup_add_constraint(j, status).map_err(|e| match e {
                    Halt::Error(e) => e,
                    Halt::Stop(_) => QPError::WorkingSetCorrupted("constraint setup stopped"),
                })?;
            } else {
                self.core.print_warning("guessed constraint is linearly dependent, left inactive");
            }
        }
        Ok(())
    }

    /// Sets the current data and the multipliers so that the iterate is
    /// optimal for the working set, then the gradient so that it is
    /// stationary.
    pub(crate) fn setup_auxiliary_data(&mut self) {
        let core = &mut self.core;
        let block = &mut self.block;
        let n = core.n;
        let relax = core.settings.bound_relaxation;

        core.setup_auxiliary_bounds(&self.work);
        for j in 0..block.m {
            let status = block.constraints.get_status(j);
            let ty = block.constraints.get_type(j);
            (block.lbA[j], block.ubA[j]) = auxiliary_range(
                status,
                ty,
                block.Ax[j],
                (self.work.lbA_target[j], self.work.ubA_target[j]),
                core.inf,
                relax,
            );
            core.y[n + j] = clamp_multiplier(status, ty, core.y[n + j]);
        }
        block.update_residuals();

        core.gradient_from_multipliers();
        block.add_multiplier_terms(&mut core.g, &core.y[n..]);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn settings() -> QPSettings<f64> {
        QPSettingsBuilder::default()
            .print_level(PrintLevel::None)
            .build()
            .unwrap()
    }

    #[test]
    fn test_guessed_working_set() {
        // min 0.5|x|^2 - x0 - x1  s.t.  x0 + x1 <= 1
        let H = Matrix::<f64>::identity(2);
        let A = Matrix::from(&[[1.0, 1.0]]);
        let data = QPProblem {
            H: Some(&H),
            g: &[-1.0, -1.0],
            A: &A,
            lb: None,
            ub: None,
            lbA: None,
            ubA: Some(&[1.0]),
        };
        let guess = InitialGuess {
            x: Some(&[0.5, 0.5]),
            constraints: Some(&[SubjectToStatus::Upper]),
            ..InitialGuess::default()
        };

        let mut qp = ConstrainedQP::<f64>::new(2, 1, settings()).unwrap();
        let result = qp.init_with_guess(&data, &guess, SolveBudget::default()).unwrap();
        assert_eq!(result.status, SolverStatus::Solved);
        assert_eq!(result.iterations, 0);
        assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Upper);

        let y = qp.dual_solution().unwrap();
        assert!((y[2] + 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_hotstart_with_working_set() {
        let H = Matrix::<f64>::identity(2);
        let A = Matrix::from(&[[1.0, 1.0]]);
        let mut qp = ConstrainedQP::<f64>::new(2, 1, settings()).unwrap();
        qp.init(
            Some(&H),
            &[0.0, 0.0],
            &A,
            None,
            None,
            Some(&[-1.0]),
            Some(&[1.0]),
            SolveBudget::default(),
        )
        .unwrap();
        assert_eq!(qp.n_active(), 0);

        // start the next solve from a wrong guess of the working set
        let result = qp
            .hotstart_with_working_set(
                &[-2.0, -2.0],
                None,
                None,
                Some(&[-1.0]),
                Some(&[1.0]),
                &[SubjectToStatus::Inactive; 2],
                &[SubjectToStatus::Lower],
                SolveBudget::default(),
            )
            .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);
        assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Upper);

        let x = qp.primal_solution().unwrap();
        assert!((x[0] - 0.5).abs() < 1e-9);
        assert!((x[1] - 0.5).abs() < 1e-9);
    }
}
