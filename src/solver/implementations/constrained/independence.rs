use super::*;

/// Entry about to join the working set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entering {
    Bound(usize),
    Constraint(usize),
}

impl<T> ConstrainedQP<T>
where
    T: FloatT,
{
    /// Threshold below which the null space weights of a row count as
    /// zero
    fn independence_tol(&self, scale: T) -> T {
        self.core.settings.eps_lin_independence * T::max(T::one(), scale)
    }

    /// Whether constraint `j` is linearly independent of the active
    /// constraints and the fixed bounds.
    pub(crate) fn constraint_is_independent(&self, j: usize) -> bool {
        let free = self.core.bounds.free().as_slice();
        let nZ = free.len() - self.block.n_active();
        let (A, Q) = (&self.block.A, &self.block.Q);

        let scale = free
            .iter()
            .fold(T::zero(), |acc, &i| T::max(acc, A[(j, i)].abs()));
        let weight = (0..nZ).fold(T::zero(), |acc, k| {
            let w = free.iter().fold(T::zero(), |s, &i| s + A[(j, i)] * Q[(i, k)]);
            T::max(acc, w.abs())
        });
        weight > self.independence_tol(scale)
    }

    /// Whether the bound of variable `i` is linearly independent of the
    /// active constraints and the fixed bounds.
    pub(crate) fn bound_is_independent(&self, i: usize) -> bool {
        let nZ = self.core.bounds.n_free() - self.block.n_active();
        let weight = (0..nZ).fold(T::zero(), |acc, k| T::max(acc, self.block.Q[(i, k)].abs()));
        weight > self.independence_tol(T::one())
    }

    /// Adds constraint `j`, first making room for it if it is linearly
    /// dependent on the working set.
    pub(crate) fn add_constraint_checked(&mut self, j: usize, status: SubjectToStatus) -> HaltResult {
        if !self.constraint_is_independent(j) {
            self.resolve_dependency(Entering::Constraint(j), status)?;
        }
        self.add_constraint(j, status)
    }

    /// Fixes variable `i`, first making room for it if its bound is
    /// linearly dependent on the working set.
    pub(crate) fn add_bound_checked(&mut self, i: usize, status: SubjectToStatus) -> HaltResult {
        if !self.bound_is_independent(i) {
            self.resolve_dependency(Entering::Bound(i), status)?;
        }
        self.add_bound(i, status)
    }

    /// Expresses the entering row through the working set, then moves
    /// along the multipliers until one of them hits zero and removes
    /// that entry.  The multiplier of the entering row is set so that
    /// stationarity is kept once it has been added.
    fn resolve_dependency(&mut self, entering: Entering, status: SubjectToStatus) -> HaltResult {
        self.core.print_warning("linear dependence in the working set, exchanging an entry");
        self.dependency_multipliers(entering)?;

        let n = self.core.n;
        if status == SubjectToStatus::Upper {
            self.work.xi.negate();
        }

        // first multiplier to reach zero along -xi
        let eps_den = self.core.settings.eps_den;
        let core = &self.core;
        let xi = &self.work.xi;
        let mut best: Option<(Blocking, T)> = None;
        let mut consider = |blocker: Blocking, side: SubjectToStatus, y: T, d: T| {
            let ratio = match side {
                SubjectToStatus::Lower if d > eps_den => T::max(y, T::zero()) / d,
                SubjectToStatus::Upper if d < -eps_den => T::min(y, T::zero()) / d,
                _ => return,
            };
            if best.map_or(true, |(_, r)| ratio < r) {
                best = Some((blocker, ratio));
            }
        };
        for &i in core.bounds.fixed() {
            if core.bounds.get_type(i) == SubjectToType::Equality {
                continue;
            }
            let side = core.bounds.get_status(i);
            consider(Blocking::Bound(i, SubjectToStatus::Inactive), side, core.y[i], xi[i]);
        }
        for &j in self.block.constraints.active() {
            if self.block.constraints.get_type(j) == SubjectToType::Equality {
                continue;
            }
            let side = self.block.active_side(j);
            let blocker = Blocking::Constraint(j, SubjectToStatus::Inactive);
            consider(blocker, side, core.y[n + j], xi[n + j]);
        }

        let Some((blocker, s)) = best else {
            return Err(Halt::Stop(SolverStatus::Infeasible));
        };
        let (blocker_index, blocker_is_bound) = match blocker {
            Blocking::Bound(i, _) => (i, true),
            Blocking::Constraint(j, _) => (j, false),
        };
        let (entering_index, entering_is_bound) = match entering {
            Entering::Bound(i) => (i, true),
            Entering::Constraint(j) => (j, false),
        };
        // the exchange would undo the previous one
        let cycling = &mut self.core.cycling;
        if cycling.status(entering_index, entering_is_bound) == CyclingStatus::PrevRemoved
            && cycling.is_cycling(blocker_index, blocker_is_bound)
        {
            return Err(Halt::Stop(SolverStatus::CyclingDetected));
        }
        cycling.clear();
        cycling.record_event(entering_index, entering_is_bound, CyclingStatus::PrevAdded);
        cycling.record_event(blocker_index, blocker_is_bound, CyclingStatus::PrevRemoved);

        // y -= s*xi over the working set
        let core = &mut self.core;
        for &i in core.bounds.fixed() {
            core.y[i] -= s * self.work.xi[i];
        }
        for &j in self.block.constraints.active() {
            core.y[n + j] -= s * self.work.xi[n + j];
        }

        match blocker {
            Blocking::Bound(i, _) => {
                self.core.print_change("exchange bound", i, SubjectToStatus::Inactive);
                self.remove_bound(i)?;
            }
            Blocking::Constraint(j, _) => {
                self.core.print_change("exchange constraint", j, SubjectToStatus::Inactive);
                self.remove_constraint(j)?;
            }
        }

        let y_new = match status {
            SubjectToStatus::Upper => -s,
            _ => s,
        };
        match entering {
            Entering::Bound(i) => self.core.y[i] = y_new,
            Entering::Constraint(j) => self.core.y[n + j] = y_new,
        }
        Ok(())
    }

    /// Writes into `xi` the multipliers expressing the entering row as a
    /// combination of the active constraints and the fixed bounds.
    fn dependency_multipliers(&mut self, entering: Entering) -> HaltResult {
        let n = self.core.n;
        let free = self.core.bounds.free().as_slice();
        let nAC = self.block.n_active();
        let nZ = free.len() - nAC;
        let work = &mut self.work;
        let block = &self.block;
        let (A, Q) = (&block.A, &block.Q);

        // Y' * a_FR
        for c in 0..nAC {
            work.rhs[c] = match entering {
                Entering::Constraint(j) => free
                    .iter()
                    .fold(T::zero(), |acc, &l| acc + Q[(l, nZ + c)] * A[(j, l)]),
                Entering::Bound(i) => Q[(i, nZ + c)],
            };
        }
        ReverseTriangular::new(&block.T, block.tcol(), nAC).solve_t(&work.rhs, &mut work.sol)?;

        work.xi.set(T::zero());
        for (k, &j) in block.constraints.active().iter().enumerate() {
            work.xi[n + j] = work.sol[k];
        }
        for &l in self.core.bounds.fixed() {
            let a_l = match entering {
                Entering::Constraint(j) => A[(j, l)],
                Entering::Bound(_) => T::zero(),
            };
            let v = block
                .constraints
                .active()
                .iter()
                .enumerate()
                .fold(a_l, |acc, (k, &j)| acc - work.sol[k] * A[(j, l)]);
            work.xi[l] = v;
        }
        Ok(())
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
    fn test_independence_checks() {
        let mut qp = ConstrainedQP::<f64>::new(2, 2, settings()).unwrap();
        let H = Matrix::<f64>::identity(2);
        // the second row is parallel to the first and never binds
        let A = Matrix::from(&[[1.0, 0.0], [2.0, 0.0]]);
        let result = qp
            .init(
                Some(&H),
                &[0.0, 0.0],
                &A,
                None,
                None,
                Some(&[1.0, -1e20]),
                Some(&[1.0, 1e20]),
                SolveBudget::default(),
            )
            .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);

        // x0 is pinned by the equality row
        assert_eq!(qp.n_active(), 1);
        assert!(!qp.constraint_is_independent(1));
        assert!(!qp.bound_is_independent(0));
        assert!(qp.bound_is_independent(1));
    }

    // x0 <= 1 and x1 <= 1 hold the solution at (1, 1), the sum row is
    // inactive and dependent on both
    fn pinned_corner() -> ConstrainedQP<f64> {
        let mut qp = ConstrainedQP::<f64>::new(2, 3, settings()).unwrap();
        let H = Matrix::<f64>::identity(2);
        let A = Matrix::from(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let result = qp
            .init(
                Some(&H),
                &[-3.0, -4.0],
                &A,
                None,
                None,
                None,
                Some(&[1.0, 1.0, 3.0]),
                SolveBudget::default(),
            )
            .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);
        assert_eq!(qp.n_active(), 2);
        assert!(!qp.constraint_is_independent(2));
        qp
    }

    #[test]
    fn test_exchange_after_earlier_addition() {
        let mut qp = pinned_corner();

        // the leaving row entered in an earlier exchange, but the
        // entering row never left: this is not a cycle
        qp.core.cycling.record_event(0, false, CyclingStatus::PrevAdded);
        assert!(qp.add_constraint_checked(2, SubjectToStatus::Upper).is_ok());

        // y = (-2, -3) and both rows enter a2 with weight one, so the
        // first row leaves
        assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Inactive);
        assert_eq!(qp.constraint_status(1).unwrap(), SubjectToStatus::Upper);
        assert_eq!(qp.constraint_status(2).unwrap(), SubjectToStatus::Upper);
        let y = qp.dual_solution().unwrap();
        assert!((y[2] - 0.0).abs() < 1e-12);
        assert!((y[3] + 1.0).abs() < 1e-12);
        assert!((y[4] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_exchange_reports_cycling() {
        let mut qp = pinned_corner();

        // the entering row just left and the leaving row just entered
        qp.core.cycling.record_event(2, false, CyclingStatus::PrevRemoved);
        qp.core.cycling.record_event(0, false, CyclingStatus::PrevAdded);
        let result = qp.add_constraint_checked(2, SubjectToStatus::Upper);
        assert!(matches!(
            result,
            Err(Halt::Stop(SolverStatus::CyclingDetected))
        ));

        // nothing was exchanged
        assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Upper);
        assert_eq!(qp.constraint_status(2).unwrap(), SubjectToStatus::Inactive);
    }
}
