//! Engine for QPs with simple bounds and general linear constraints,
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T H x + g^T x\\\\\[2ex\]
//!  \text{subject to} & lb \le x \le ub \\\\\[1ex\]
//!         & lbA \le Ax \le ubA.
//!  \end{array}
//! $$
//!
//! Besides the Cholesky factor of the projected Hessian the engine
//! maintains a TQ factorisation of the active constraint rows.  Both
//! are updated with plane rotations on every working set change.

#![allow(non_snake_case)]

use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::solver::core::*;
use crate::solver::utils::copy_or_fill;
use crate::solver::workingset::*;

mod block;
mod enabling;
mod homotopy;
mod independence;
mod solve;
mod tq;

pub(crate) use block::ConstraintBlock;

/// Online active-set solver for QPs with general linear constraints.
///
/// ```
/// use hotqp::algebra::*;
/// use hotqp::io::ConfigurablePrintTarget;
/// use hotqp::solver::*;
///
/// // minimise x'x/2 subject to x0 + x1 = 1
/// let H = Matrix::identity(2);
/// let A = Matrix::from(&[[1.0, 1.0]]);
/// let mut qp = ConstrainedQP::<f64>::new(2, 1, QPSettings::default()).unwrap();
/// qp.print_to_sink();
///
/// let result = qp
///     .init(Some(&H), &[0.0, 0.0], &A, None, None, Some(&[1.0]), Some(&[1.0]), SolveBudget::default())
///     .unwrap();
/// assert_eq!(result.status, SolverStatus::Solved);
/// let x = qp.primal_solution().unwrap();
/// assert!((x[0] - 0.5).abs() < 1e-10 && (x[1] - 0.5).abs() < 1e-10);
/// ```
pub struct ConstrainedQP<T: FloatT = f64> {
    pub(crate) core: HomotopyCore<T>,
    pub(crate) work: Workspace<T>,
    pub(crate) block: ConstraintBlock<T>,
}

/// Borrowed data of one constrained QP.  Absent bounds are infinite.
#[derive(Debug, Clone, Copy)]
pub struct QPProblem<'a, T> {
    pub H: Option<&'a Matrix<T>>,
    pub g: &'a [T],
    pub A: &'a Matrix<T>,
    pub lb: Option<&'a [T]>,
    pub ub: Option<&'a [T]>,
    pub lbA: Option<&'a [T]>,
    pub ubA: Option<&'a [T]>,
}

impl<T> ConstrainedQP<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize, settings: QPSettings<T>) -> Result<Self, QPError> {
        if n == 0 {
            return Err(QPError::ZeroDimension);
        }
        settings.validate()?;
        Ok(Self {
            core: HomotopyCore::new(n, m, settings),
            work: Workspace::new(n, m),
            block: ConstraintBlock::new(n, m),
        })
    }

    /// Declares the structure of the Hessian passed to the next `init`.
    /// `Zero` and `Identity` allow calling `init` without a matrix.
    pub fn set_hessian_type(&mut self, hessian_type: HessianType) {
        self.core.hessian_hint = hessian_type;
    }

    pub fn hessian_type(&self) -> HessianType {
        self.core.hessian_type
    }

    /// Installs a user supplied evaluation of the rows of `A*x`.  The
    /// stored matrix is still used for all factorisations.
    pub fn set_constraint_product<P>(&mut self, product: P)
    where
        P: ConstraintProduct<T> + 'static,
    {
        self.block.product = Some(Box::new(product));
    }

    pub fn clear_constraint_product(&mut self) {
        self.block.product = None;
    }

    pub fn settings(&self) -> &QPSettings<T> {
        &self.core.settings
    }

    /// Replaces the settings.  The equality detection switch can only
    /// change before the first `init`.
    pub fn set_settings(&mut self, settings: QPSettings<T>) -> Result<(), QPError> {
        self.core.replace_settings(settings)
    }

    /// Clears data, factorisations and the working set.  The engine
    /// must be initialised again.  An installed constraint product is
    /// kept.
    pub fn reset(&mut self) {
        self.core.reset();
        self.block.reset();
    }

    pub fn n_variables(&self) -> usize {
        self.core.n
    }

    pub fn n_constraints(&self) -> usize {
        self.block.m
    }

    pub fn n_free(&self) -> usize {
        self.core.bounds.n_free()
    }

    pub fn n_fixed(&self) -> usize {
        self.core.bounds.n_fixed()
    }

    pub fn n_active(&self) -> usize {
        self.block.n_active()
    }

    pub fn n_inactive(&self) -> usize {
        self.block.constraints.n_inactive()
    }

    /// dimension of the null space of the active rows over the free
    /// variables
    pub fn n_nullspace(&self) -> usize {
        self.n_free() - self.n_active()
    }

    pub fn status(&self) -> QPStatus {
        self.core.status
    }

    pub fn info(&self) -> &QPInfo<T> {
        &self.core.info
    }

    pub fn primal_solution(&self) -> Result<&[T], QPError> {
        self.core.require_solution()?;
        Ok(&self.core.x)
    }

    /// Multipliers of the `n` bounds followed by those of the `m`
    /// constraints, positive at lower and negative at upper sides
    pub fn dual_solution(&self) -> Result<&[T], QPError> {
        self.core.require_solution()?;
        Ok(&self.core.y)
    }

    /// Objective value at the current iterate, with respect to the
    /// Hessian as given by the caller
    pub fn objective_value(&self) -> Result<T, QPError> {
        self.core.require_solution()?;
        Ok(self.core.objective_value())
    }

    pub fn bounds(&self) -> &Bounds {
        &self.core.bounds
    }

    pub fn constraints(&self) -> &Constraints {
        &self.block.constraints
    }

    pub fn bound_status(&self, i: usize) -> Result<SubjectToStatus, QPError> {
        if i >= self.core.n {
            return Err(QPError::IndexOutOfBounds {
                index: i,
                size: self.core.n,
            });
        }
        Ok(self.core.bounds.get_status(i))
    }

    pub fn constraint_status(&self, j: usize) -> Result<SubjectToStatus, QPError> {
        if j >= self.block.m {
            return Err(QPError::IndexOutOfBounds {
                index: j,
                size: self.block.m,
            });
        }
        Ok(self.block.constraints.get_status(j))
    }

    /// Writes +1 (lower), -1 (upper) or 0 for the `n` bounds followed
    /// by the `m` constraints
    pub fn working_set(&self, ws: &mut [i8]) -> Result<(), QPError> {
        self.core.require_initialised()?;
        let n = self.core.n;
        check_dimension("working set", n + self.block.m, ws.len())?;
        self.core.bound_working_set(&mut ws[..n]);
        self.block.working_set(&mut ws[n..]);
        Ok(())
    }

    /// Current value of `A*x`
    pub fn constraint_values(&self) -> Result<&[T], QPError> {
        self.core.require_solution()?;
        Ok(&self.block.Ax)
    }

    /// Cholesky factor of the projected Hessian `Z'*H*Z`, held in the
    /// leading `n_nullspace x n_nullspace` block
    pub fn R(&self) -> &Matrix<T> {
        &self.core.R
    }

    /// Orthogonal factor `[Z Y]` of the TQ factorisation.  Rows are
    /// indexed by variable, columns `0..n_free` are in use.
    pub fn Q(&self) -> &Matrix<T> {
        &self.block.Q
    }

    /// Reverse triangular factor of the TQ factorisation.  The active
    /// block is held in rows `0..n_active` of the rightmost `n_active`
    /// columns.
    pub fn T(&self) -> &Matrix<T> {
        &self.block.T
    }

    /// Violation of the optimality conditions of the QP currently held
    /// by the engine, including any regularisation
    pub fn kkt_violation(&self) -> Result<KKTViolation<T>, QPError> {
        self.core.require_solution()?;
        let core = &self.core;
        let mut resid = core.g.clone();
        core.H.gemv(&mut resid, &core.x, T::one(), T::one());
        let mut kkt = KKTViolation::default();
        core.bound_kkt_violation(&mut resid, &mut kkt);
        self.block.kkt_violation(core, &mut resid, &mut kkt);
        kkt.stationarity = resid.norm_inf();
        Ok(kkt)
    }

    pub fn print_properties(&mut self) -> std::io::Result<()> {
        let n_active = self.block.n_active();
        self.core.print_properties("ConstrainedQP", n_active)
    }
}

impl<T> ConfigurablePrintTarget for ConstrainedQP<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.core.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.core.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn std::io::Write + Send + Sync>) {
        self.core.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.core.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.core.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.core.get_print_buffer()
    }
}
