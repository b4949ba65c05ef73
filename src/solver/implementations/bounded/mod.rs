//! Engine for QPs with simple bounds only,
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T H x + g^T x\\\\\[2ex\]
//!  \text{subject to} & lb \le x \le ub.
//!  \end{array}
//! $$
//!
//! The engine keeps a Cholesky factor of the Hessian restricted to the
//! free variables and updates it each time a bound enters or leaves
//! the working set.

#![allow(non_snake_case)]

use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::solver::core::*;
use crate::solver::workingset::*;

mod homotopy;
mod solve;

/// Online active-set solver for bound constrained QPs.
///
/// Solutions remain available between calls and are used as the
/// starting point of the next [`hotstart`](BoundedQP::hotstart).
///
/// ```
/// use hotqp::algebra::*;
/// use hotqp::io::ConfigurablePrintTarget;
/// use hotqp::solver::*;
///
/// let H = Matrix::from(&[[1.0, 0.0], [0.0, 1.0]]);
/// let mut qp = BoundedQP::<f64>::new(2, QPSettings::default()).unwrap();
/// qp.print_to_sink();
///
/// let result = qp
///     .init(Some(&H), &[1.0, -1.0], Some(&[0.0, 0.0]), Some(&[2.0, 2.0]), SolveBudget::default())
///     .unwrap();
/// assert_eq!(result.status, SolverStatus::Solved);
/// let x = qp.primal_solution().unwrap();
/// assert!((x[0] - 0.0).abs() < 1e-10 && (x[1] - 1.0).abs() < 1e-10);
/// ```
pub struct BoundedQP<T: FloatT = f64> {
    pub(crate) core: HomotopyCore<T>,
    pub(crate) work: Workspace<T>,
}

impl<T> BoundedQP<T>
where
    T: FloatT,
{
    pub fn new(n: usize, settings: QPSettings<T>) -> Result<Self, QPError> {
        if n == 0 {
            return Err(QPError::ZeroDimension);
        }
        settings.validate()?;
        Ok(Self {
            core: HomotopyCore::new(n, 0, settings),
            work: Workspace::new(n, 0),
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

    pub fn settings(&self) -> &QPSettings<T> {
        &self.core.settings
    }

    /// Replaces the settings.  The equality detection switch can only
    /// change before the first `init`.
    pub fn set_settings(&mut self, settings: QPSettings<T>) -> Result<(), QPError> {
        self.core.replace_settings(settings)
    }

    /// Clears data, factorisations and the working set.  The engine
    /// must be initialised again.
    pub fn reset(&mut self) {
        self.core.reset();
    }

    pub fn n_variables(&self) -> usize {
        self.core.n
    }

    pub fn n_free(&self) -> usize {
        self.core.bounds.n_free()
    }

    pub fn n_fixed(&self) -> usize {
        self.core.bounds.n_fixed()
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

    /// Bound multipliers, positive at lower and negative at upper bounds
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

    pub fn bound_status(&self, i: usize) -> Result<SubjectToStatus, QPError> {
        if i >= self.core.n {
            return Err(QPError::IndexOutOfBounds {
                index: i,
                size: self.core.n,
            });
        }
        Ok(self.core.bounds.get_status(i))
    }

    /// Writes +1 (lower), -1 (upper) or 0 for every bound
    pub fn working_set(&self, ws: &mut [i8]) -> Result<(), QPError> {
        self.core.require_initialised()?;
        check_dimension("working set", self.core.n, ws.len())?;
        self.core.bound_working_set(ws);
        Ok(())
    }

    /// Cholesky factor of the Hessian restricted to the free variables,
    /// held in the leading `n_free x n_free` block
    pub fn R(&self) -> &Matrix<T> {
        &self.core.R
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
        kkt.stationarity = resid.norm_inf();
        Ok(kkt)
    }

    pub fn print_properties(&mut self) -> std::io::Result<()> {
        self.core.print_properties("BoundedQP", 0)
    }
}

impl<T> ConfigurablePrintTarget for BoundedQP<T>
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
