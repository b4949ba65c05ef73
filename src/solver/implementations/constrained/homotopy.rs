use super::*;

impl<T> HomotopyEngine<T> for ConstrainedQP<T>
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
        let tol = self.core.settings.bound_tolerance;
        self.core.bound_targets_consistent(&self.work)
            && self.block.targets_consistent(&self.work, tol)
    }

    fn prepare_homotopy(&mut self) -> HaltResult {
        while let Some(j) = self.block.first_disabling() {
            self.absorb_constraint_multiplier(j);
            self.remove_constraint(j)?;
            self.block.constraints.move_inactive_to_disabled(j)?;
            self.block.disabling_side[j] = SubjectToStatus::Inactive;
            self.core.print_change("disable constraint", j, SubjectToStatus::Disabled);
        }
        while let Some(i) = self.core.bound_losing_active_side(&self.work) {
            self.core.absorb_bound_multiplier(i);
            self.remove_bound(i)?;
        }
        while let Some(j) = self
            .block
            .constraint_losing_active_side(&self.work, self.core.inf)
        {
            self.absorb_constraint_multiplier(j);
            self.remove_constraint(j)?;
        }
        Ok(())
    }

    fn determine_data_shift(&mut self) {
        self.core.bound_data_shift(&mut self.work);
        let relax = self.core.settings.bound_relaxation;
        self.block.data_shift(&mut self.work, self.core.inf, relax);
    }

    fn determine_step_direction(&mut self) -> HaltResult {
        let core = &self.core;
        let work = &mut self.work;
        let block = &self.block;
        let (H, A, Q) = (&core.H, &block.A, &block.Q);
        let n = core.n;
        let free = core.bounds.free().as_slice();
        let fixed = core.bounds.fixed().as_slice();
        let active = block.constraints.active().as_slice();
        let nAC = active.len();
        let nZ = free.len() - nAC;
        let triangle = ReverseTriangular::new(&block.T, block.tcol(), nAC);

        for &i in fixed {
            work.delta_x[i] = match core.bounds.get_status(i) {
                SubjectToStatus::Upper => work.delta_ub[i],
                _ => work.delta_lb[i],
            };
        }

        // range space part: T * Δx_Y = ΔbA_AC - A_AC,FX * Δx_FX
        for (c, &j) in active.iter().enumerate() {
            let db = match block.active_side(j) {
                SubjectToStatus::Upper => work.delta_ubA[j],
                _ => work.delta_lbA[j],
            };
            work.rhs[c] = fixed
                .iter()
                .fold(db, |acc, &l| acc - A[(j, l)] * work.delta_x[l]);
        }
        triangle.solve(&work.rhs, &mut work.sol)?;
        for &i in free {
            work.delta_x[i] = (0..nAC).fold(T::zero(), |acc, c| acc + Q[(i, nZ + c)] * work.sol[c]);
        }

        // null space part: Z'HZ * Δx_Z = -Z'(Δg + H*Δx_YFX)
        for &i in free {
            work.hvec[i] = (0..n).fold(work.delta_g[i], |acc, l| acc + H[(i, l)] * work.delta_x[l]);
        }
        for k in 0..nZ {
            work.rhs[k] = -free
                .iter()
                .fold(T::zero(), |acc, &i| acc + Q[(i, k)] * work.hvec[i]);
        }
        solve_normal(&core.R, nZ, &mut work.rhs)?;
        for &i in free {
            work.delta_x[i] += (0..nZ).fold(T::zero(), |acc, k| acc + Q[(i, k)] * work.rhs[k]);
        }

        // multipliers from Δg + H*Δx = A_AC'*Δy_AC + Δy_FX
        for i in 0..n {
            work.hvec[i] = (0..n).fold(work.delta_g[i], |acc, l| acc + H[(i, l)] * work.delta_x[l]);
        }
        for c in 0..nAC {
            work.rhs[c] = free
                .iter()
                .fold(T::zero(), |acc, &i| acc + Q[(i, nZ + c)] * work.hvec[i]);
        }
        triangle.solve_t(&work.rhs, &mut work.sol)?;

        work.delta_y.set(T::zero());
        for (k, &j) in active.iter().enumerate() {
            work.delta_y[n + j] = work.sol[k];
        }
        for &i in fixed {
            work.delta_y[i] = active
                .iter()
                .enumerate()
                .fold(work.hvec[i], |acc, (k, &j)| acc - A[(j, i)] * work.sol[k]);
        }

        let block = &mut self.block;
        for j in 0..block.m {
            work.delta_Ax[j] = if block.is_enabled(j) {
                block.row_product(j, &work.delta_x)
            } else {
                T::zero()
            };
        }
        Ok(())
    }

    fn ratio_test(&mut self) -> (T, Option<Blocking>) {
        let mut tau = T::one();
        let mut blocking = None;
        self.core
            .bound_ratio_test(&self.work, &mut tau, &mut blocking);
        self.block
            .ratio_test(&self.core, &self.work, &mut tau, &mut blocking);
        (tau, blocking)
    }

    fn perform_step(&mut self, tau: T) {
        self.core.apply_bound_step(&self.work, tau);
        self.block.apply_step(&self.work, tau);
        self.core.check_jumps(&self.work, tau);
    }

    fn homotopy_length(&self) -> T {
        T::max(
            self.core.bound_homotopy_length(&self.work),
            self.block.homotopy_length(&self.work, self.core.inf),
        )
    }

    fn change_active_set(&mut self, blocking: Blocking) -> HaltResult {
        match blocking {
            Blocking::Bound(i, SubjectToStatus::Inactive) => {
                self.core.print_change("remove bound", i, SubjectToStatus::Inactive);
                self.remove_bound(i)
            }
            Blocking::Bound(i, status) => {
                self.core.print_change("add bound", i, status);
                self.add_bound_checked(i, status)
            }
            Blocking::Constraint(j, SubjectToStatus::Inactive) => {
                self.core.print_change("remove constraint", j, SubjectToStatus::Inactive);
                self.remove_constraint(j)
            }
            Blocking::Constraint(j, status) => {
                self.core.print_change("add constraint", j, status);
                self.add_constraint_checked(j, status)
            }
        }
    }

    fn refactorise(&mut self) -> HaltResult {
        match self.factorise_projected_with_regularisation() {
            Err(QPError::HessianNotPositiveDefinite) => {
                self.core.factor_stale = true;
                Err(Halt::Stop(SolverStatus::Unbounded))
            }
            other => other.map_err(Halt::from),
        }
    }

    fn drift_correction(&mut self) {
        let n = self.core.n;
        let core = &mut self.core;
        core.bound_drift_correction();
        self.block.drift_correction(&core.x, &mut core.y[n..]);
        core.gradient_from_multipliers();
        self.block.add_multiplier_terms(&mut core.g, &core.y[n..]);
    }

    fn n_active(&self) -> usize {
        self.block.n_active()
    }
}

impl<T> ConstrainedQP<T>
where
    T: FloatT,
{
    /// Releases a constraint without touching any factorisation,
    /// keeping stationarity by absorbing its multiplier into `g`.
    pub(crate) fn absorb_constraint_multiplier(&mut self, j: usize) {
        let core = &mut self.core;
        let yj = core.y[core.n + j];
        for (i, g) in core.g.iter_mut().enumerate() {
            *g -= yj * self.block.A[(j, i)];
        }
        core.y[core.n + j] = T::zero();
    }
}
