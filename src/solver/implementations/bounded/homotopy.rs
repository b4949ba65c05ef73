use super::*;

impl<T> HomotopyEngine<T> for BoundedQP<T>
where
    T: FloatT,
{
    fn core(&self) -> &HomotopyCore<T> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut HomotopyCore<T> {
        &mut self.core
    }

    fn split_mut(&mut self) -> (&mut HomotopyCore<T>, &mut Workspace<T>) {
        (&mut self.core, &mut self.work)
    }

    fn targets_consistent(&self) -> bool {
        self.core.bound_targets_consistent(&self.work)
    }

    fn prepare_homotopy(&mut self) -> HaltResult {
        while let Some(i) = self.core.bound_losing_active_side(&self.work) {
            self.core.absorb_bound_multiplier(i);
            self.remove_bound(i)?;
        }
        Ok(())
    }

    fn determine_data_shift(&mut self) {
        self.core.bound_data_shift(&mut self.work);
    }

    fn determine_step_direction(&mut self) -> HaltResult {
        let core = &self.core;
        let work = &mut self.work;
        let H = &core.H;
        let free = core.bounds.free();
        let fixed = core.bounds.fixed();

        for &i in fixed {
            work.delta_x[i] = match core.bounds.get_status(i) {
                SubjectToStatus::Upper => work.delta_ub[i],
                _ => work.delta_lb[i],
            };
        }

        // H_FR,FR * Δx_FR = -(Δg_FR + H_FR,FX * Δx_FX)
        for (p, &i) in free.iter().enumerate() {
            let mut v = work.delta_g[i];
            for &j in fixed {
                v += H[(i, j)] * work.delta_x[j];
            }
            work.rhs[p] = -v;
        }
        solve_normal(&core.R, free.len(), &mut work.rhs)?;
        for (p, &i) in free.iter().enumerate() {
            work.delta_x[i] = work.rhs[p];
            work.delta_y[i] = T::zero();
        }

        // Δy_FX = Δg_FX + H_FX,: * Δx
        for &i in fixed {
            let mut v = work.delta_g[i];
            for j in 0..core.n {
                v += H[(i, j)] * work.delta_x[j];
            }
            work.delta_y[i] = v;
        }
        Ok(())
    }

    fn ratio_test(&mut self) -> (T, Option<Blocking>) {
        let mut tau = T::one();
        let mut blocking = None;
        self.core
            .bound_ratio_test(&self.work, &mut tau, &mut blocking);
        (tau, blocking)
    }

    fn perform_step(&mut self, tau: T) {
        self.core.apply_bound_step(&self.work, tau);
        self.core.check_jumps(&self.work, tau);
    }

    fn homotopy_length(&self) -> T {
        self.core.bound_homotopy_length(&self.work)
    }

    fn change_active_set(&mut self, blocking: Blocking) -> HaltResult {
        match blocking {
            Blocking::Bound(i, SubjectToStatus::Inactive) => {
                self.core.print_change("remove bound", i, SubjectToStatus::Inactive);
                self.remove_bound(i)
            }
            Blocking::Bound(i, status) => {
                self.core.print_change("add bound", i, status);
                self.add_bound(i, status)
            }
            Blocking::Constraint(..) => {
                Err(QPError::WorkingSetCorrupted("constraint change without constraints").into())
            }
        }
    }

    fn refactorise(&mut self) -> HaltResult {
        self.factorise_with_regularisation()?;
        Ok(())
    }

    fn drift_correction(&mut self) {
        self.core.bound_drift_correction();
        self.core.gradient_from_multipliers();
    }

    fn n_active(&self) -> usize {
        0
    }
}

impl<T> BoundedQP<T>
where
    T: FloatT,
{
    /// Fixes a free variable at one of its bounds.
    pub(crate) fn add_bound(&mut self, i: usize, status: SubjectToStatus) -> HaltResult {
        let core = &mut self.core;
        let p = core
            .bounds
            .free()
            .get_index(i)
            .ok_or(WorkingSetError::NotPresent(i))?;
        cholesky_remove_column(&mut core.R, core.bounds.n_free(), p)?;
        core.bounds.move_free_to_fixed(i, status)?;
        Ok(())
    }

    /// Frees a fixed variable.  Its multiplier must be zero.  If the
    /// Hessian restricted to the enlarged free set is not positive
    /// definite the QP is unbounded, unless it can still be regularised.
    pub(crate) fn remove_bound(&mut self, i: usize) -> HaltResult {
        let core = &mut self.core;
        let work = &mut self.work;
        let nFR = core.bounds.n_free();

        for (p, &j) in core.bounds.free().iter().enumerate() {
            work.rhs[p] = core.H[(j, i)];
        }
        let diag = core.H[(i, i)];
        let pivot_tol = core.pivot_tol();

        let appended = cholesky_append_column(&mut core.R, nFR, &mut work.rhs, diag, pivot_tol)?;
        if !appended {
            if !core.regularise_hessian() {
                return Err(Halt::Stop(SolverStatus::Unbounded));
            }
            core.print_regularisation();
            core.shift_gradient_for_regularisation();
            core.bounds.move_fixed_to_free(i)?;
            core.y[i] = T::zero();
            return self.factorise().map_err(Halt::from);
        }

        core.bounds.move_fixed_to_free(i)?;
        core.y[i] = T::zero();
        Ok(())
    }

    /// Factorises the Hessian restricted to the free variables from
    /// scratch.
    pub(crate) fn factorise(&mut self) -> Result<(), QPError> {
        let core = &mut self.core;
        let S = &mut self.work.S;
        let free = core.bounds.free().as_slice();
        for (q, &j) in free.iter().enumerate() {
            for (p, &i) in free.iter().enumerate().take(q + 1) {
                S[(p, q)] = core.H[(i, j)];
            }
        }
        let pivot_tol = core.pivot_tol();
        core.R.data.set(T::zero());
        cholesky_upper(S, free.len(), &mut core.R, pivot_tol).map_err(|e| match e {
            DenseFactorizationError::Cholesky(_) => QPError::HessianNotPositiveDefinite,
            e => e.into(),
        })
    }

    /// As [`factorise`](Self::factorise), regularising the Hessian once
    /// if the factorisation fails.  The gradient is shifted so that the
    /// current iterate keeps its optimality.
    pub(crate) fn factorise_with_regularisation(&mut self) -> Result<(), QPError> {
        match self.factorise() {
            Err(QPError::HessianNotPositiveDefinite) if self.core.regularise_hessian() => {
                self.core.print_regularisation();
                self.core.shift_gradient_for_regularisation();
                self.factorise()
            }
            other => other,
        }
    }
}
