use super::*;

// ---------------------------------
// TQ and projected Cholesky updates
// ---------------------------------

/// Rotates the null space columns `0..nZ` of `Q` so that the weights
/// `w` of some row collect in column `nZ-1`.  When a factor is given,
/// it is kept upper triangular for the rotated null space.
fn collect_into_last_z<T: FloatT>(
    Q: &mut Matrix<T>,
    mut R: Option<&mut Matrix<T>>,
    w: &mut [T],
    nZ: usize,
    free: &[usize],
) {
    for k in 0..nZ.saturating_sub(1) {
        let (rot, r) = GivensRotation::zeroing(w[k + 1], w[k]);
        w[k + 1] = r;
        w[k] = T::zero();
        rot.rotate_cols(Q, k + 1, k, free.iter().copied());

        if let Some(R) = R.as_deref_mut() {
            rot.rotate_cols(R, k + 1, k, 0..=(k + 1));
            let (rot, d) = GivensRotation::zeroing(R[(k, k)], R[(k + 1, k)]);
            R[(k, k)] = d;
            R[(k + 1, k)] = T::zero();
            rot.rotate_rows(R, k, k + 1, (k + 1)..nZ);
        }
    }
}

/// Appends row `nAC` to the active block of `T`, whose first column
/// moves one to the left.  `gamma` is the weight on the former last
/// null space column, `w_y` the weights on the old range space.
fn append_t_row<T: FloatT>(Tm: &mut Matrix<T>, size_t: usize, nAC: usize, gamma: T, w_y: &[T]) {
    let tcol = size_t - nAC - 1;
    for i in 0..nAC {
        Tm[(i, tcol)] = T::zero();
    }
    Tm[(nAC, tcol)] = gamma;
    for (c, &v) in w_y.iter().enumerate().take(nAC) {
        Tm[(nAC, tcol + 1 + c)] = v;
    }
}

/// Zeroes row and column `k` of a factor that shrinks to `k x k`
fn truncate_factor<T: FloatT>(R: &mut Matrix<T>, k: usize) {
    for i in 0..=k {
        R[(i, k)] = T::zero();
        R[(k, i)] = T::zero();
    }
}

impl<T> ConstrainedQP<T>
where
    T: FloatT,
{
    /// Weights of constraint row `j` on the free columns of `Q`
    fn constraint_weights(&mut self, j: usize) {
        let free = self.core.bounds.free().as_slice();
        let nFR = free.len();
        let (A, Q) = (&self.block.A, &self.block.Q);
        for (k, w) in self.work.w.iter_mut().enumerate().take(nFR) {
            *w = free.iter().fold(T::zero(), |acc, &i| acc + A[(j, i)] * Q[(i, k)]);
        }
    }

    /// Builds `Q` as the identity over the free variables with no
    /// active constraints.
    pub(crate) fn setup_tq(&mut self) {
        let block = &mut self.block;
        block.Q.data.set(T::zero());
        block.T.data.set(T::zero());
        for (l, &i) in self.core.bounds.free().iter().enumerate() {
            block.Q[(i, l)] = T::one();
        }
    }

    /// Activates a constraint while the auxiliary QP is prepared.  Only
    /// the TQ factorisation is updated; the projected Hessian is
    /// factorised once the working set is complete.
    pub(crate) fn setup_add_constraint(&mut self, j: usize, status: SubjectToStatus) -> HaltResult {
        let nFR = self.core.bounds.n_free();
        let nAC = self.block.n_active();
        let nZ = nFR - nAC;
        if nZ == 0 {
            return Err(QPError::WorkingSetCorrupted("no null space left for a constraint").into());
        }

        self.constraint_weights(j);
        let free = self.core.bounds.free().as_slice();
        let w = &mut self.work.w[..nFR];
        collect_into_last_z(&mut self.block.Q, None, w, nZ, free);
        append_t_row(&mut self.block.T, self.block.size_t, nAC, w[nZ - 1], &w[nZ..]);

        self.block.constraints.move_inactive_to_active(j, status)?;
        Ok(())
    }

    /// Adds a linearly independent constraint to the working set.
    pub(crate) fn add_constraint(&mut self, j: usize, status: SubjectToStatus) -> HaltResult {
        let nFR = self.core.bounds.n_free();
        let nAC = self.block.n_active();
        let nZ = nFR - nAC;
        if nZ == 0 {
            return Err(QPError::WorkingSetCorrupted("no null space left for a constraint").into());
        }

        self.constraint_weights(j);
        let free = self.core.bounds.free().as_slice();
        let w = &mut self.work.w[..nFR];
        collect_into_last_z(&mut self.block.Q, Some(&mut self.core.R), w, nZ, free);
        append_t_row(&mut self.block.T, self.block.size_t, nAC, w[nZ - 1], &w[nZ..]);
        truncate_factor(&mut self.core.R, nZ - 1);

        self.block.constraints.move_inactive_to_active(j, status)?;
        Ok(())
    }

    /// Removes an active constraint from the working set.  Its
    /// multiplier is set to zero.
    pub(crate) fn remove_constraint(&mut self, j: usize) -> HaltResult {
        let k = self
            .block
            .constraints
            .active()
            .get_index(j)
            .ok_or(WorkingSetError::NotPresent(j))?;
        let nFR = self.core.bounds.n_free();
        let nAC = self.block.n_active();
        let nZ = nFR - nAC;
        let size_t = self.block.size_t;
        let tcol = size_t - nAC;
        let free = self.core.bounds.free().as_slice();
        let (Tm, Q) = (&mut self.block.T, &mut self.block.Q);

        // drop row k, leaving one entry too many in the rows below
        for i in k..(nAC - 1) {
            for c in tcol..size_t {
                Tm[(i, c)] = Tm[(i + 1, c)];
            }
        }
        for c in tcol..size_t {
            Tm[(nAC - 1, c)] = T::zero();
        }

        for i in k..(nAC - 1) {
            let c = nAC - 2 - i;
            let (rot, r) = GivensRotation::zeroing(Tm[(i, tcol + c + 1)], Tm[(i, tcol + c)]);
            Tm[(i, tcol + c + 1)] = r;
            Tm[(i, tcol + c)] = T::zero();
            rot.rotate_cols(Tm, tcol + c + 1, tcol + c, (i + 1)..(nAC - 1));
            rot.rotate_cols(Q, nZ + c + 1, nZ + c, free.iter().copied());
        }
        for i in 0..nAC {
            Tm[(i, tcol)] = T::zero();
        }

        self.block.constraints.move_active_to_inactive(j)?;
        self.core.y[self.core.n + j] = T::zero();

        // column nZ of Q joins the null space
        self.append_null_space_column(nZ)
    }

    /// Fixes a free variable at one of its bounds.  The bound must be
    /// linearly independent of the working set.
    pub(crate) fn add_bound(&mut self, i: usize, status: SubjectToStatus) -> HaltResult {
        let nFR = self.core.bounds.n_free();
        let nAC = self.block.n_active();
        let nZ = nFR - nAC;
        if nZ == 0 {
            return Err(QPError::WorkingSetCorrupted("no null space left for a bound").into());
        }
        let tcol = self.block.size_t - nAC;

        for k in 0..nFR {
            self.work.w[k] = self.block.Q[(i, k)];
        }
        let free = self.core.bounds.free().as_slice();
        let w = &mut self.work.w[..nFR];
        let (Tm, Q) = (&mut self.block.T, &mut self.block.Q);
        collect_into_last_z(Q, Some(&mut self.core.R), w, nZ, free);

        // carry the weight through the range space, using a scratch
        // column left of the active block of T
        let v = &mut self.work.tcol[..nAC];
        v.set(T::zero());
        for k in 0..nAC {
            let (rot, r) = GivensRotation::zeroing(w[nZ + k], w[nZ - 1 + k]);
            w[nZ + k] = r;
            w[nZ - 1 + k] = T::zero();
            rot.rotate_cols(Q, nZ + k, nZ - 1 + k, free.iter().copied());
            for row in 0..nAC {
                let left = if k == 0 { v[row] } else { Tm[(row, tcol + k - 1)] };
                let (a, b) = rot.apply(Tm[(row, tcol + k)], left);
                Tm[(row, tcol + k)] = a;
                if k == 0 {
                    v[row] = b;
                } else {
                    Tm[(row, tcol + k - 1)] = b;
                }
            }
        }

        // the scratch column becomes the first one of the block, the
        // last one belonged to the variable being fixed
        for c in (1..nAC).rev() {
            for row in 0..nAC {
                Tm[(row, tcol + c)] = Tm[(row, tcol + c - 1)];
            }
        }
        for row in 0..nAC {
            Tm[(row, tcol)] = v[row];
        }

        for k in 0..self.core.n {
            Q[(i, k)] = T::zero();
        }
        for &l in free {
            Q[(l, nFR - 1)] = T::zero();
        }
        truncate_factor(&mut self.core.R, nZ - 1);

        self.core.bounds.move_free_to_fixed(i, status)?;
        Ok(())
    }

    /// Frees a fixed variable.  Its multiplier is set to zero.
    pub(crate) fn remove_bound(&mut self, i: usize) -> HaltResult {
        let nFR = self.core.bounds.n_free();
        let nAC = self.block.n_active();
        let nZ = nFR - nAC;
        let tcol = self.block.size_t - nAC;

        self.core.bounds.move_fixed_to_free(i)?;
        let free = self.core.bounds.free().as_slice();
        let (Tm, Q) = (&mut self.block.T, &mut self.block.Q);

        for k in 0..self.core.n {
            Q[(i, k)] = T::zero();
        }
        Q[(i, nFR)] = T::one();

        // the new column of A_AC,FR*Q sits right of the active block
        let v = &mut self.work.tcol[..nAC];
        for (r, &j) in self.block.constraints.active().iter().enumerate() {
            v[r] = self.block.A[(j, i)];
        }

        for r in 0..nAC {
            let c = nAC - 1 - r;
            let last = c + 1 == nAC;
            let right = |Tm: &Matrix<T>, v: &[T], row: usize| {
                if last {
                    v[row]
                } else {
                    Tm[(row, tcol + c + 1)]
                }
            };
            let (rot, _) = GivensRotation::zeroing(right(&*Tm, &*v, r), Tm[(r, tcol + c)]);
            for row in r..nAC {
                let (a, b) = rot.apply(right(&*Tm, &*v, row), Tm[(row, tcol + c)]);
                if last {
                    v[row] = a;
                } else {
                    Tm[(row, tcol + c + 1)] = a;
                }
                Tm[(row, tcol + c)] = b;
            }
            Tm[(r, tcol + c)] = T::zero();
            rot.rotate_cols(Q, nZ + c + 1, nZ + c, free.iter().copied());
        }

        // the first column of the block is now zero, drop it
        for c in 0..nAC {
            for row in 0..nAC {
                Tm[(row, tcol + c)] = if c + 1 == nAC {
                    v[row]
                } else {
                    Tm[(row, tcol + c + 1)]
                };
            }
        }

        self.core.y[i] = T::zero();

        // column nZ of Q joins the null space
        self.append_null_space_column(nZ)
    }

    /// Grows the projected Hessian factor by the null space column
    /// `nZ` of `Q`.  If the projected Hessian stops being positive
    /// definite the QP is unbounded, unless it can still be regularised.
    fn append_null_space_column(&mut self, nZ: usize) -> HaltResult {
        let core = &mut self.core;
        let work = &mut self.work;
        let Q = &self.block.Q;
        let free = core.bounds.free().as_slice();

        for &i in free {
            work.hvec[i] = free
                .iter()
                .fold(T::zero(), |acc, &l| acc + core.H[(i, l)] * Q[(l, nZ)]);
        }
        for p in 0..nZ {
            work.rhs[p] = free
                .iter()
                .fold(T::zero(), |acc, &i| acc + Q[(i, p)] * work.hvec[i]);
        }
        let diag = free
            .iter()
            .fold(T::zero(), |acc, &i| acc + Q[(i, nZ)] * work.hvec[i]);
        let pivot_tol = core.pivot_tol();

        if cholesky_append_column(&mut core.R, nZ, &mut work.rhs, diag, pivot_tol)? {
            return Ok(());
        }

        if core.regularise_hessian() {
            core.print_regularisation();
            core.shift_gradient_for_regularisation();
            return self.factorise_projected().map_err(Halt::from);
        }
        core.factor_stale = true;
        Err(Halt::Stop(SolverStatus::Unbounded))
    }

    /// Factorises the projected Hessian `Z'*H*Z` from scratch.
    pub(crate) fn factorise_projected(&mut self) -> Result<(), QPError> {
        let core = &mut self.core;
        let work = &mut self.work;
        let Q = &self.block.Q;
        let free = core.bounds.free().as_slice();
        let nZ = free.len() - self.block.constraints.n_active();

        for k in 0..nZ {
            for &i in free {
                work.HZ[(i, k)] = free
                    .iter()
                    .fold(T::zero(), |acc, &l| acc + core.H[(i, l)] * Q[(l, k)]);
            }
        }
        for q in 0..nZ {
            for p in 0..=q {
                work.S[(p, q)] = free
                    .iter()
                    .fold(T::zero(), |acc, &i| acc + Q[(i, p)] * work.HZ[(i, q)]);
            }
        }

        let pivot_tol = core.pivot_tol();
        core.R.data.set(T::zero());
        cholesky_upper(&work.S, nZ, &mut core.R, pivot_tol).map_err(|e| match e {
            DenseFactorizationError::Cholesky(_) => QPError::HessianNotPositiveDefinite,
            e => e.into(),
        })
    }

    /// As [`factorise_projected`](Self::factorise_projected),
    /// regularising the Hessian once if the factorisation fails.
    pub(crate) fn factorise_projected_with_regularisation(&mut self) -> Result<(), QPError> {
        match self.factorise_projected() {
            Err(QPError::HessianNotPositiveDefinite) if self.core.regularise_hessian() => {
                self.core.print_regularisation();
                self.core.shift_gradient_for_regularisation();
                self.factorise_projected()
            }
            other => other,
        }
    }
}
