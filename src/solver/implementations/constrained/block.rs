use super::*;

/// General linear constraints `lbA <= A*x <= ubA` together with their
/// working set and the TQ factorisation of the active rows.
///
/// With `Q = [Z Y]` spanning the free variables, `A_AC,FR * Q = [0 T]`
/// where `T` is reverse triangular.  Rows of `Q` are indexed by
/// variable, and only rows of free variables are nonzero.  The active
/// block of `T` occupies rows `0..nAC` and the rightmost `nAC` columns.
pub(crate) struct ConstraintBlock<T: FloatT> {
    pub m: usize,
    pub A: Matrix<T>,
    // current data on the homotopy path
    pub lbA: Vec<T>,
    pub ubA: Vec<T>,
    pub constraints: Constraints,
    // side a disabling constraint was active at
    pub disabling_side: Vec<SubjectToStatus>,

    pub Q: Matrix<T>,
    pub T: Matrix<T>,
    pub size_t: usize,

    pub Ax: Vec<T>,
    // Ax - lbA and ubA - Ax
    pub Ax_l: Vec<T>,
    pub Ax_u: Vec<T>,

    pub product: Option<BoxedConstraintProduct<T>>,
}

impl<T> ConstraintBlock<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        let size_t = usize::min(n, m);
        Self {
            m,
            A: Matrix::zeros((m, n)),
            lbA: vec![T::zero(); m],
            ubA: vec![T::zero(); m],
            constraints: Constraints::new(m),
            disabling_side: vec![SubjectToStatus::Inactive; m],
            Q: Matrix::zeros((n, n)),
            T: Matrix::zeros((size_t, size_t)),
            size_t,
            Ax: vec![T::zero(); m],
            Ax_l: vec![T::zero(); m],
            Ax_u: vec![T::zero(); m],
            product: None,
        }
    }

    pub fn reset(&mut self) {
        self.A.data.set(T::zero());
        self.lbA.set(T::zero());
        self.ubA.set(T::zero());
        self.constraints.reset();
        self.disabling_side.fill(SubjectToStatus::Inactive);
        self.Q.data.set(T::zero());
        self.T.data.set(T::zero());
        self.Ax.set(T::zero());
        self.Ax_l.set(T::zero());
        self.Ax_u.set(T::zero());
    }

    pub fn n_active(&self) -> usize {
        self.constraints.n_active()
    }

    /// first column of the active block of T
    pub fn tcol(&self) -> usize {
        self.size_t - self.n_active()
    }

    /// Side at which an active or disabling constraint is held
    pub fn active_side(&self, j: usize) -> SubjectToStatus {
        match self.constraints.get_status(j) {
            SubjectToStatus::Disabling => self.disabling_side[j],
            s => s,
        }
    }

    pub fn is_enabled(&self, j: usize) -> bool {
        self.constraints.get_status(j) != SubjectToStatus::Disabled
    }

    /// `A[j,:]*v`, through the user supplied product if there is one
    pub fn row_product(&mut self, j: usize, v: &[T]) -> T {
        match self.product.as_mut() {
            Some(p) => p.product(j, v),
            None => self.A.row_dot(j, v),
        }
    }

    /// Recomputes `A*x` and the residuals to both sides
    pub fn update_products(&mut self, x: &[T]) {
        for j in 0..self.m {
            self.Ax[j] = self.row_product(j, x);
        }
        self.update_residuals();
    }

    pub fn update_residuals(&mut self) {
        for j in 0..self.m {
            self.Ax_l[j] = self.Ax[j] - self.lbA[j];
            self.Ax_u[j] = self.ubA[j] - self.Ax[j];
        }
    }

    /// Adds `A'*y_C` to `g`
    pub fn add_multiplier_terms(&self, g: &mut [T], y_c: &[T]) {
        self.A.gemv_t(g, y_c, T::one(), T::one());
    }

    pub fn load_targets(
        &mut self,
        work: &mut Workspace<T>,
        lbA: Option<&[T]>,
        ubA: Option<&[T]>,
        inf: T,
    ) -> Result<(), QPError> {
        if let Some(lbA) = lbA {
            check_dimension("lbA", self.m, lbA.len())?;
        }
        if let Some(ubA) = ubA {
            check_dimension("ubA", self.m, ubA.len())?;
        }
        copy_or_fill(&mut work.lbA_target, lbA, -inf);
        copy_or_fill(&mut work.ubA_target, ubA, inf);
        Ok(())
    }

    pub fn check_matrix(&self, A: &Matrix<T>) -> Result<(), QPError> {
        check_dimension("A (rows)", self.A.nrows(), A.nrows())?;
        check_dimension("A (cols)", self.A.ncols(), A.ncols())?;
        if !A.is_finite() {
            return Err(QPError::InvalidArgument("constraint matrix has non-finite entries"));
        }
        Ok(())
    }

    pub fn load_matrix(&mut self, A: &Matrix<T>) -> Result<(), QPError> {
        self.check_matrix(A)?;
        self.A.copy_from(A);
        Ok(())
    }

    pub fn update_types(&mut self, work: &Workspace<T>, settings: &QPSettings<T>, inf: T) {
        self.constraints.setup_types(
            &work.lbA_target,
            &work.ubA_target,
            inf,
            settings.bound_tolerance,
            settings.enable_equalities,
        );
    }

    pub fn targets_consistent(&self, work: &Workspace<T>, tol: T) -> bool {
        (0..self.m)
            .filter(|&j| self.is_enabled(j))
            .all(|j| work.lbA_target[j] <= work.ubA_target[j] + tol)
    }

    /// First active constraint whose active side becomes infinite
    pub fn constraint_losing_active_side(&self, work: &Workspace<T>, inf: T) -> Option<usize> {
        self.constraints.active().iter().copied().find(|&j| {
            match self.constraints.get_status(j) {
                SubjectToStatus::Lower => work.lbA_target[j] <= -inf,
                SubjectToStatus::Upper => work.ubA_target[j] >= inf,
                _ => false,
            }
        })
    }

    pub fn first_disabling(&self) -> Option<usize> {
        self.constraints
            .active()
            .iter()
            .copied()
            .find(|&j| self.constraints.get_status(j) == SubjectToStatus::Disabling)
    }

    /// Computes `ΔlbA` and `ΔubA`, see
    /// [`HomotopyCore::bound_data_shift`].
    pub fn data_shift(&mut self, work: &mut Workspace<T>, inf: T, relax: T) {
        for j in 0..self.m {
            if !self.is_enabled(j) {
                work.delta_lbA[j] = T::zero();
                work.delta_ubA[j] = T::zero();
                continue;
            }
            (self.lbA[j], self.ubA[j]) = shift_free_range(
                (self.lbA[j], self.ubA[j]),
                (work.lbA_target[j], work.ubA_target[j]),
                self.Ax[j],
                inf,
                relax,
            );
            work.delta_lbA[j] = finite_delta(work.lbA_target[j], self.lbA[j], inf);
            work.delta_ubA[j] = finite_delta(work.ubA_target[j], self.ubA[j], inf);
        }
        self.update_residuals();
    }

    /// Ratio test over the constraints, continuing the one over the
    /// bounds.
    pub fn ratio_test(
        &self,
        core: &HomotopyCore<T>,
        work: &Workspace<T>,
        tau: &mut T,
        blocking: &mut Option<Blocking>,
    ) {
        let n = core.n;
        let inf = core.inf;

        for &j in self.constraints.active() {
            if self.constraints.get_type(j) == SubjectToType::Equality {
                continue;
            }
            let y = core.y[n + j];
            let dy = work.delta_y[n + j];
            let (num, den) = match self.active_side(j) {
                SubjectToStatus::Lower => (y, -dy),
                _ => (-y, dy),
            };
            if let Some(t) = core.blocking_ratio(num, den, *tau) {
                *tau = t;
                *blocking = Some(Blocking::Constraint(j, SubjectToStatus::Inactive));
            }
        }

        for &j in self.constraints.inactive() {
            if self.constraints.get_type(j) == SubjectToType::Unbounded {
                continue;
            }
            if self.lbA[j] > -inf {
                let den = work.delta_lbA[j] - work.delta_Ax[j];
                if let Some(t) = core.blocking_ratio(self.Ax_l[j], den, *tau) {
                    *tau = t;
                    *blocking = Some(Blocking::Constraint(j, SubjectToStatus::Lower));
                }
            }
            if self.ubA[j] < inf {
                let den = work.delta_Ax[j] - work.delta_ubA[j];
                if let Some(t) = core.blocking_ratio(self.Ax_u[j], den, *tau) {
                    *tau = t;
                    *blocking = Some(Blocking::Constraint(j, SubjectToStatus::Upper));
                }
            }
        }
    }

    pub fn apply_step(&mut self, work: &Workspace<T>, tau: T) {
        if tau == T::zero() {
            return;
        }
        for j in 0..self.m {
            if !self.is_enabled(j) {
                continue;
            }
            self.lbA[j] += tau * work.delta_lbA[j];
            self.ubA[j] += tau * work.delta_ubA[j];
            self.Ax[j] += tau * work.delta_Ax[j];
            self.Ax_l[j] += tau * (work.delta_Ax[j] - work.delta_lbA[j]);
            self.Ax_u[j] += tau * (work.delta_ubA[j] - work.delta_Ax[j]);
        }
    }

    pub fn homotopy_length(&self, work: &Workspace<T>, inf: T) -> T {
        let mut len = T::zero();
        for j in (0..self.m).filter(|&j| self.is_enabled(j)) {
            if work.lbA_target[j] > -inf {
                len = T::max(len, relative_distance(work.lbA_target[j], self.lbA[j]));
            }
            if work.ubA_target[j] < inf {
                len = T::max(len, relative_distance(work.ubA_target[j], self.ubA[j]));
            }
        }
        len
    }

    /// Relaxes the constraint data around `A*x`, see
    /// [`HomotopyCore::bound_drift_correction`].
    pub fn drift_correction(&mut self, x: &[T], y_c: &mut [T]) {
        for j in 0..self.m {
            self.Ax[j] = self.row_product(j, x);
            let ax = self.Ax[j];
            match self.constraints.get_status(j) {
                SubjectToStatus::Disabled => {
                    y_c[j] = T::zero();
                    continue;
                }
                SubjectToStatus::Inactive => {
                    self.lbA[j] = T::min(self.lbA[j], ax);
                    self.ubA[j] = T::max(self.ubA[j], ax);
                    y_c[j] = T::zero();
                }
                _ => match self.active_side(j) {
                    SubjectToStatus::Upper => {
                        self.ubA[j] = ax;
                        self.lbA[j] = T::min(self.lbA[j], ax);
                    }
                    _ => {
                        self.lbA[j] = ax;
                        self.ubA[j] = T::max(self.ubA[j], ax);
                    }
                },
            }
        }
        self.update_residuals();
    }

    /// Constraint part of the optimality conditions, see
    /// [`HomotopyCore::bound_kkt_violation`].
    pub fn kkt_violation(
        &self,
        core: &HomotopyCore<T>,
        resid: &mut [T],
        kkt: &mut KKTViolation<T>,
    ) {
        let n = core.n;
        let y_c = &core.y[n..];
        self.A.gemv_t(resid, y_c, -T::one(), T::one());

        for j in (0..self.m).filter(|&j| self.is_enabled(j)) {
            let ax = self.A.row_dot(j, &core.x);
            let (l, u) = (self.lbA[j], self.ubA[j]);
            if l > -core.inf {
                kkt.feasibility = T::max(kkt.feasibility, l - ax);
            }
            if u < core.inf {
                kkt.feasibility = T::max(kkt.feasibility, ax - u);
            }
            let (sign, compl) = multiplier_violation(
                self.active_side(j),
                self.constraints.get_type(j),
                y_c[j],
                ax - l,
                u - ax,
            );
            kkt.dual_sign = T::max(kkt.dual_sign, sign);
            kkt.complementarity = T::max(kkt.complementarity, compl);
        }
    }

    /// Writes +1 (lower), -1 (upper) or 0 for every constraint
    pub fn working_set(&self, ws: &mut [i8]) {
        for (j, w) in ws.iter_mut().enumerate().take(self.m) {
            *w = self.constraints.get_status(j).sign();
        }
    }
}
