//! Engine for sequences of QPs whose Hessian and constraint matrix
//! change between solves.
//!
//! A hotstart replaces `H` and `A`, then rebuilds all factorisations
//! from scratch for the working set of the previous solution.  The
//! homotopy towards the new vectors is then run as for
//! [`ConstrainedQP`].

#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::core::*;
use crate::solver::implementations::constrained::ConstrainedQP;
use crate::solver::workingset::*;
use crate::timers::*;
use std::ops::{Deref, DerefMut};

/// Online active-set solver for QPs with varying matrices.
///
/// Everything but [`hotstart`](VaryingQP::hotstart) is inherited from
/// [`ConstrainedQP`].
pub struct VaryingQP<T: FloatT = f64> {
    qp: ConstrainedQP<T>,
    // working set of the previous solution
    bound_statuses: Vec<SubjectToStatus>,
    constraint_statuses: Vec<SubjectToStatus>,
    // matrices and constraint data of the previous solution
    saved: SavedData<T>,
}

/// Data overwritten by an exchange of matrices, restored if the new
/// working set cannot be factorised.
struct SavedData<T: FloatT> {
    H: Matrix<T>,
    hessian_type: HessianType,
    reg_val: T,
    A: Matrix<T>,
    lbA: Vec<T>,
    ubA: Vec<T>,
    Ax: Vec<T>,
}

impl<T> SavedData<T>
where
    T: FloatT,
{
    fn new(n: usize, m: usize) -> Self {
        Self {
            H: Matrix::zeros((n, n)),
            hessian_type: HessianType::Unknown,
            reg_val: T::zero(),
            A: Matrix::zeros((m, n)),
            lbA: vec![T::zero(); m],
            ubA: vec![T::zero(); m],
            Ax: vec![T::zero(); m],
        }
    }

    fn save(&mut self, qp: &ConstrainedQP<T>) {
        self.H.copy_from(&qp.core.H);
        self.hessian_type = qp.core.hessian_type;
        self.reg_val = qp.core.reg_val;
        self.A.copy_from(&qp.block.A);
        self.lbA.copy_from(&qp.block.lbA);
        self.ubA.copy_from(&qp.block.ubA);
        self.Ax.copy_from(&qp.block.Ax);
    }

    fn restore(&self, qp: &mut ConstrainedQP<T>) {
        qp.core.H.copy_from(&self.H);
        qp.core.hessian_type = self.hessian_type;
        qp.core.reg_val = self.reg_val;
        qp.block.A.copy_from(&self.A);
        qp.block.lbA.copy_from(&self.lbA);
        qp.block.ubA.copy_from(&self.ubA);
        qp.block.Ax.copy_from(&self.Ax);
        qp.block.update_residuals();
    }
}

impl<T> Deref for VaryingQP<T>
where
    T: FloatT,
{
    type Target = ConstrainedQP<T>;

    fn deref(&self) -> &Self::Target {
        &self.qp
    }
}

impl<T> DerefMut for VaryingQP<T>
where
    T: FloatT,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.qp
    }
}

impl<T> VaryingQP<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize, settings: QPSettings<T>) -> Result<Self, QPError> {
        Ok(Self {
            qp: ConstrainedQP::new(n, m, settings)?,
            bound_statuses: vec![SubjectToStatus::Inactive; n],
            constraint_statuses: vec![SubjectToStatus::Inactive; m],
            saved: SavedData::new(n, m),
        })
    }

    pub fn into_inner(self) -> ConstrainedQP<T> {
        self.qp
    }

    /// Solves the next QP of the sequence with new matrices, starting
    /// from the current solution and working set.
    ///
    /// Constraints of the previous working set that are linearly
    /// dependent for the new `A` are made inactive, as are constraints
    /// waiting to be disabled.  `H` may be omitted when the Hessian type
    /// has been set to `Zero` or `Identity`.
    ///
    /// If the call fails before the homotopy starts, the previous `H`
    /// and `A` stay in place and the next hotstart continues from the
    /// previous solution.
    #[allow(clippy::too_many_arguments)]
    pub fn hotstart(
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
        self.qp.core.require_initialised()?;
        let time_budget = self.qp.core.start_budget(&budget);

        let setup;
        timeit! {self.qp.core.timers => "setup"; {
            setup = self.exchange_matrices(H, g, A, lb, ub, lbA, ubA);
        }}
        if let Err(e) = setup {
            self.qp.core.status = QPStatus::HomotopyQPSolved;
            return Err(e);
        }
        self.qp.core.status = QPStatus::AuxiliaryQPSolved;

        let result;
        timeit! {self.qp.core.timers => "homotopy"; {
            result = solve_homotopy(&mut self.qp, &budget, time_budget);
        }}
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn exchange_matrices(
        &mut self,
        H: Option<&Matrix<T>>,
        g: &[T],
        A: &Matrix<T>,
        lb: Option<&[T]>,
        ub: Option<&[T]>,
        lbA: Option<&[T]>,
        ubA: Option<&[T]>,
    ) -> Result<(), QPError> {
        // nothing is overwritten before every argument has been checked
        let hessian_type = self.qp.core.check_hessian(H, self.qp.core.hessian_hint)?;
        self.qp.block.check_matrix(A)?;
        self.qp.load_targets(g, lb, ub, lbA, ubA)?;

        self.bound_statuses.copy_from_slice(self.qp.core.bounds.statuses());
        for j in 0..self.qp.block.m {
            self.constraint_statuses[j] = match self.qp.block.constraints.get_status(j) {
                SubjectToStatus::Disabling => SubjectToStatus::Disabled,
                status => status,
            };
        }
        self.saved.save(&self.qp);

        if let Err(e) = self.install_matrices(H, hessian_type, A) {
            self.rollback();
            return Err(e);
        }
        Ok(())
    }

    /// Replaces the matrices and rebuilds the previous working set for
    /// them.
    fn install_matrices(
        &mut self,
        H: Option<&Matrix<T>>,
        hessian_type: HessianType,
        A: &Matrix<T>,
    ) -> Result<(), QPError> {
        let qp = &mut self.qp;
        let n = qp.core.n;

        // keep the residuals of the current iterate for the new rows
        qp.block.A.copy_from(A);
        let inf = qp.core.inf;
        let block = &mut qp.block;
        for j in 0..block.m {
            let ax = block.row_product(j, &qp.core.x);
            let shift = ax - block.Ax[j];
            if block.lbA[j] > -inf {
                block.lbA[j] += shift;
            }
            if block.ubA[j] < inf {
                block.ubA[j] += shift;
            }
            block.Ax[j] = ax;
        }
        qp.core.install_hessian(H, hessian_type);

        // previous working set, without constraints waiting to be disabled
        for j in 0..qp.block.m {
            if qp.block.constraints.get_status(j) == SubjectToStatus::Disabling {
                qp.block.constraints.set_status(j, SubjectToStatus::Disabled)?;
                qp.core.y[n + j] = T::zero();
            }
        }

        qp.rebuild_working_set(
            Some(self.bound_statuses.as_slice()),
            Some(self.constraint_statuses.as_slice()),
            GuessSource::default(),
        )?;
        qp.correct_data_for_working_set();
        qp.core.factor_stale = false;
        Ok(())
    }

    /// Puts the previous matrices back after a failed exchange and
    /// rebuilds the previous working set for them.
    fn rollback(&mut self) {
        self.saved.restore(&mut self.qp);
        let rebuilt = self.qp.rebuild_working_set(
            Some(self.bound_statuses.as_slice()),
            Some(self.constraint_statuses.as_slice()),
            GuessSource::default(),
        );
        match rebuilt {
            Ok(()) => {
                self.qp.correct_data_for_working_set();
                self.qp.core.factor_stale = false;
            }
            Err(_) => self.qp.core.factor_stale = true,
        }
    }
}

impl<T> ConstrainedQP<T>
where
    T: FloatT,
{
    /// Moves the current data the least needed for the current iterate
    /// to be optimal for the working set, then sets the gradient so
    /// that it is stationary.
    pub(crate) fn correct_data_for_working_set(&mut self) {
        let n = self.core.n;
        let core = &mut self.core;
        for i in 0..n {
            let (status, ty) = (core.bounds.get_status(i), core.bounds.get_type(i));
            core.y[i] = clamp_multiplier(status, ty, core.y[i]);
        }
        core.bound_drift_correction();

        let block = &mut self.block;
        for j in 0..block.m {
            let status = block.constraints.get_status(j);
            let ty = block.constraints.get_type(j);
            core.y[n + j] = clamp_multiplier(status, ty, core.y[n + j]);
        }
        block.drift_correction(&core.x, &mut core.y[n..]);

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
    fn test_new_matrices() {
        let mut qp = VaryingQP::<f64>::new(2, 1, settings()).unwrap();

        // min 0.5|x|^2 - x0 - x1  s.t.  x0 + x1 <= 1
        let H = Matrix::<f64>::identity(2);
        let A = Matrix::from(&[[1.0, 1.0]]);
        let result = qp
            .init(Some(&H), &[-1.0, -1.0], &A, None, None, None, Some(&[1.0]), SolveBudget::default())
            .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);
        assert_eq!(qp.n_active(), 1);

        // min x0^2 + 0.5 x1^2 - x0 - x1  s.t.  x0 <= 0.25
        let H = Matrix::from(&[[2.0, 0.0], [0.0, 1.0]]);
        let A = Matrix::from(&[[1.0, 0.0]]);
        let result = qp
            .hotstart(
                Some(&H),
                &[-1.0, -1.0],
                &A,
                None,
                None,
                None,
                Some(&[0.25]),
                SolveBudget::default(),
            )
            .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);

        let x = qp.primal_solution().unwrap();
        assert!((x[0] - 0.25).abs() < 1e-9);
        assert!((x[1] - 1.0).abs() < 1e-9);
        assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Upper);
        let y = qp.dual_solution().unwrap();
        assert!((y[2] + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejected_matrices_are_not_kept() {
        let mut qp = VaryingQP::<f64>::new(2, 1, settings()).unwrap();

        let H = Matrix::<f64>::identity(2);
        let A = Matrix::from(&[[1.0, 1.0]]);
        let result = qp
            .init(Some(&H), &[-1.0, -1.0], &A, None, None, None, Some(&[1.0]), SolveBudget::default())
            .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);

        // indefinite Hessian together with a new A
        let H = Matrix::from(&[[1.0, 0.0], [0.0, -1.0]]);
        let A = Matrix::from(&[[1.0, 0.0]]);
        let result = qp.hotstart(
            Some(&H),
            &[-1.0, -1.0],
            &A,
            None,
            None,
            None,
            Some(&[1.0]),
            SolveBudget::default(),
        );
        assert_eq!(result.unwrap_err(), QPError::HessianIndefinite);
        assert_eq!(qp.hessian_type(), HessianType::Identity);

        // the next hotstart still sees H = I and A = [1 1]
        let result = ConstrainedQP::hotstart(
            &mut qp,
            &[-1.0, -1.0],
            Some(&[-5.0, -5.0]),
            Some(&[5.0, 5.0]),
            None,
            Some(&[1.0]),
            SolveBudget::default(),
        )
        .unwrap();
        assert_eq!(result.status, SolverStatus::Solved);

        let x = qp.primal_solution().unwrap();
        assert!((x[0] - 0.5).abs() < 1e-9);
        assert!((x[1] - 0.5).abs() < 1e-9);
        assert_eq!(qp.constraint_status(0).unwrap(), SubjectToStatus::Upper);
    }

    #[test]
    fn test_requires_init() {
        let mut qp = VaryingQP::<f64>::new(1, 1, settings()).unwrap();
        let H = Matrix::<f64>::identity(1);
        let A = Matrix::<f64>::identity(1);
        let result = qp.hotstart(Some(&H), &[0.0], &A, None, None, None, None, SolveBudget::default());
        assert_eq!(result.unwrap_err(), QPError::NotInitialised);
    }
}
