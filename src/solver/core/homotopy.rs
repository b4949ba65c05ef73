use super::*;
use crate::algebra::*;
use crate::io::PrintTarget;
use crate::solver::utils::copy_or_fill;
use crate::solver::utils::infbounds::infinity;
use crate::solver::workingset::*;
use crate::timers::*;
use itertools::izip;
use std::iter::zip;

/// Index that limits the current homotopy step, together with the
/// status it is about to take.  `Inactive` means removal from the
/// working set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Blocking {
    Bound(usize, SubjectToStatus),
    Constraint(usize, SubjectToStatus),
}

/// State shared by every engine: the Hessian, the simple bounds and
/// their working set, the Cholesky factor of the projected Hessian,
/// and the primal-dual iterate.
///
/// Stationarity is kept in the form `H*x + g = A'*y_C + y_B`, so that
/// multipliers are nonnegative at lower and nonpositive at upper sides.
pub(crate) struct HomotopyCore<T: FloatT> {
    pub n: usize,
    pub m: usize,

    pub H: Matrix<T>,
    pub hessian_type: HessianType,
    // type supplied by the caller, applied at the next init
    pub hessian_hint: HessianType,
    pub reg_val: T,

    // data of the QP currently solved on the homotopy path
    pub g: Vec<T>,
    pub lb: Vec<T>,
    pub ub: Vec<T>,
    // gradient of the last user supplied target
    pub g_user: Vec<T>,

    pub bounds: Bounds,
    pub R: Matrix<T>,

    pub x: Vec<T>,
    pub y: Vec<T>,

    pub status: QPStatus,
    pub cycling: CyclingManager,
    pub settings: QPSettings<T>,
    pub info: QPInfo<T>,
    pub stream: PrintTarget,
    pub timers: Timers,

    // bound infinity captured at init
    pub inf: T,
    // working set changes since init, drives periodic maintenance
    pub iter_count: u32,
    // R no longer matches the working set
    pub factor_stale: bool,
}

impl<T> HomotopyCore<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize, settings: QPSettings<T>) -> Self {
        Self {
            n,
            m,
            H: Matrix::zeros((n, n)),
            hessian_type: HessianType::Unknown,
            hessian_hint: HessianType::Unknown,
            reg_val: T::zero(),
            g: vec![T::zero(); n],
            lb: vec![T::zero(); n],
            ub: vec![T::zero(); n],
            g_user: vec![T::zero(); n],
            bounds: Bounds::new(n),
            R: Matrix::zeros((n, n)),
            x: vec![T::zero(); n],
            y: vec![T::zero(); n + m],
            status: QPStatus::NotInitialised,
            cycling: CyclingManager::new(),
            settings,
            info: QPInfo::new(),
            stream: PrintTarget::default(),
            timers: Timers::default(),
            inf: infinity(),
            iter_count: 0,
            factor_stale: false,
        }
    }

    /// Forgets all data and the working set.  Dimensions, settings, the
    /// Hessian type hint and the print target are kept.
    pub fn reset(&mut self) {
        self.H.data.set(T::zero());
        self.hessian_type = HessianType::Unknown;
        self.reg_val = T::zero();
        self.g.set(T::zero());
        self.lb.set(T::zero());
        self.ub.set(T::zero());
        self.g_user.set(T::zero());
        self.bounds.reset();
        self.R.data.set(T::zero());
        self.x.set(T::zero());
        self.y.set(T::zero());
        self.status = QPStatus::NotInitialised;
        self.cycling.clear();
        self.info.reset();
        self.timers.reset();
        self.inf = infinity();
        self.iter_count = 0;
        self.factor_stale = false;
    }

    pub fn require_solution(&self) -> Result<(), QPError> {
        if self.status.has_solution() {
            Ok(())
        } else {
            Err(QPError::NotSolved)
        }
    }

    pub fn require_initialised(&self) -> Result<(), QPError> {
        if self.status == QPStatus::NotInitialised {
            Err(QPError::NotInitialised)
        } else {
            Ok(())
        }
    }

    pub fn replace_settings(&mut self, settings: QPSettings<T>) -> Result<(), QPError> {
        settings.validate()?;
        if self.status != QPStatus::NotInitialised
            && settings.enable_equalities != self.settings.enable_equalities
        {
            return Err(SettingsError::ImmutableSetting("enable_equalities").into());
        }
        self.settings = settings;
        Ok(())
    }

    /// Starts the clock of a call
    pub fn start_budget(&self, budget: &SolveBudget) -> TimeBudget {
        let limit = budget.time_limit.unwrap_or(self.settings.time_limit);
        TimeBudget::new(limit, self.settings.time_estimate_weight)
    }

    // ---------------------------------
    // target data
    // ---------------------------------

    /// Copies the target gradient and bounds into the workspace,
    /// replacing absent bounds by ±infinity.
    pub fn load_bound_targets(
        &mut self,
        work: &mut Workspace<T>,
        g: &[T],
        lb: Option<&[T]>,
        ub: Option<&[T]>,
    ) -> Result<(), QPError> {
        check_dimension("g", self.n, g.len())?;
        if let Some(lb) = lb {
            check_dimension("lb", self.n, lb.len())?;
        }
        if let Some(ub) = ub {
            check_dimension("ub", self.n, ub.len())?;
        }
        work.g_target.copy_from(g);
        self.g_user.copy_from(g);
        copy_or_fill(&mut work.lb_target, lb, -self.inf);
        copy_or_fill(&mut work.ub_target, ub, self.inf);
        Ok(())
    }

    pub fn bound_targets_consistent(&self, work: &Workspace<T>) -> bool {
        let tol = self.settings.bound_tolerance;
        zip(&work.lb_target, &work.ub_target).all(|(&l, &u)| l <= u + tol)
    }

    pub fn update_bound_types(&mut self, work: &Workspace<T>) {
        self.bounds.setup_types(
            &work.lb_target,
            &work.ub_target,
            self.inf,
            self.settings.bound_tolerance,
            self.settings.enable_equalities,
        );
    }

    /// Fixed bounds whose active side is about to disappear are released
    /// before the homotopy starts.  Returns the first such bound.
    pub fn bound_losing_active_side(&self, work: &Workspace<T>) -> Option<usize> {
        self.bounds.fixed().iter().copied().find(|&i| {
            match self.bounds.get_status(i) {
                SubjectToStatus::Lower => work.lb_target[i] <= -self.inf,
                SubjectToStatus::Upper => work.ub_target[i] >= self.inf,
                _ => false,
            }
        })
    }

    /// Computes `Δg`, `Δlb` and `Δub`.
    ///
    /// Infinite sides never move along the path: an infinite target is
    /// taken over at once, and an infinite current bound with a finite
    /// target is first pulled in to a finite value away from `x`.  Both
    /// leave the iterate optimal, as active sides are always finite.
    pub fn bound_data_shift(&mut self, work: &mut Workspace<T>) {
        let relax = self.settings.bound_relaxation;
        for i in 0..self.n {
            work.delta_g[i] = work.g_target[i] - self.g[i];

            (self.lb[i], self.ub[i]) = shift_free_range(
                (self.lb[i], self.ub[i]),
                (work.lb_target[i], work.ub_target[i]),
                self.x[i],
                self.inf,
                relax,
            );
            work.delta_lb[i] = finite_delta(work.lb_target[i], self.lb[i], self.inf);
            work.delta_ub[i] = finite_delta(work.ub_target[i], self.ub[i], self.inf);
        }
    }

    /// Step length allowed by a single ratio, if it is blocking.
    #[inline]
    pub fn blocking_ratio(&self, num: T, den: T, tau: T) -> Option<T> {
        if den >= self.settings.eps_den && num >= self.settings.eps_num {
            let ratio = T::max(num, T::zero()) / den;
            if ratio < tau {
                return Some(ratio);
            }
        }
        None
    }

    /// Ratio test over the simple bounds: multipliers of fixed bounds
    /// must keep their sign, free variables must stay within their
    /// shifted bounds.
    pub fn bound_ratio_test(
        &self,
        work: &Workspace<T>,
        tau: &mut T,
        blocking: &mut Option<Blocking>,
    ) {
        for &i in self.bounds.fixed() {
            if self.bounds.get_type(i) == SubjectToType::Equality {
                continue;
            }
            let (num, den) = match self.bounds.get_status(i) {
                SubjectToStatus::Lower => (self.y[i], -work.delta_y[i]),
                _ => (-self.y[i], work.delta_y[i]),
            };
            if let Some(t) = self.blocking_ratio(num, den, *tau) {
                *tau = t;
                *blocking = Some(Blocking::Bound(i, SubjectToStatus::Inactive));
            }
        }

        for &i in self.bounds.free() {
            if self.bounds.get_type(i) == SubjectToType::Unbounded {
                continue;
            }
            if self.lb[i] > -self.inf {
                let num = self.x[i] - self.lb[i];
                let den = work.delta_lb[i] - work.delta_x[i];
                if let Some(t) = self.blocking_ratio(num, den, *tau) {
                    *tau = t;
                    *blocking = Some(Blocking::Bound(i, SubjectToStatus::Lower));
                }
            }
            if self.ub[i] < self.inf {
                let num = self.ub[i] - self.x[i];
                let den = work.delta_x[i] - work.delta_ub[i];
                if let Some(t) = self.blocking_ratio(num, den, *tau) {
                    *tau = t;
                    *blocking = Some(Blocking::Bound(i, SubjectToStatus::Upper));
                }
            }
        }
    }

    /// Moves the iterate and the bound data a fraction `tau` along the
    /// homotopy.
    pub fn apply_bound_step(&mut self, work: &Workspace<T>, tau: T) {
        if tau == T::zero() {
            return;
        }
        self.x.axpby(tau, &work.delta_x, T::one());
        self.y.axpby(tau, &work.delta_y, T::one());
        self.g.axpby(tau, &work.delta_g, T::one());
        self.lb.axpby(tau, &work.delta_lb, T::one());
        self.ub.axpby(tau, &work.delta_ub, T::one());
    }

    /// Largest relative distance between current and target data of
    /// the gradient and the simple bounds.  Infinite targets are skipped.
    pub fn bound_homotopy_length(&self, work: &Workspace<T>) -> T {
        let targets = izip!(&work.g_target, &work.lb_target, &work.ub_target);
        let current = izip!(&self.g, &self.lb, &self.ub);
        let mut len = T::zero();
        for ((&gt, &lt, &ut), (&g, &l, &u)) in zip(targets, current) {
            len = T::max(len, relative_distance(gt, g));
            if lt > -self.inf {
                len = T::max(len, relative_distance(lt, l));
            }
            if ut < self.inf {
                len = T::max(len, relative_distance(ut, u));
            }
        }
        len
    }

    /// Warns about unusually large primal or dual steps
    pub fn check_jumps(&mut self, work: &Workspace<T>, tau: T) {
        if tau * work.delta_x.norm_inf() > self.settings.max_primal_jump {
            self.print_warning("large primal step along the homotopy path");
        }
        if tau * work.delta_y.norm_inf() > self.settings.max_dual_jump {
            self.print_warning("large dual step along the homotopy path");
        }
    }

    /// Sets `g = y_B - H*x`, making the iterate stationary for the
    /// bound multipliers.  Constraint terms are added by the caller.
    pub fn gradient_from_multipliers(&mut self) {
        self.g.copy_from(&self.y[0..self.n]);
        self.H.gemv(&mut self.g, &self.x, -T::one(), T::one());
    }

    /// Accumulates the bound part of the optimality conditions.  On
    /// entry `resid` holds `H*x + g`, on return the bound multipliers
    /// have been subtracted.
    pub fn bound_kkt_violation(&self, resid: &mut [T], kkt: &mut KKTViolation<T>) {
        for i in 0..self.n {
            resid[i] -= self.y[i];
            let (x, y, l, u) = (self.x[i], self.y[i], self.lb[i], self.ub[i]);
            if l > -self.inf {
                kkt.feasibility = T::max(kkt.feasibility, l - x);
            }
            if u < self.inf {
                kkt.feasibility = T::max(kkt.feasibility, x - u);
            }
            let (sign, compl) = multiplier_violation(
                self.bounds.get_status(i),
                self.bounds.get_type(i),
                y,
                x - l,
                u - x,
            );
            kkt.dual_sign = T::max(kkt.dual_sign, sign);
            kkt.complementarity = T::max(kkt.complementarity, compl);
        }
    }

    /// Releases a fixed bound without touching any factorisation,
    /// keeping stationarity by absorbing its multiplier into `g`.
    pub fn absorb_bound_multiplier(&mut self, i: usize) {
        self.g[i] -= self.y[i];
        self.y[i] = T::zero();
    }

    /// Relaxes the bound data around the iterate so that the iterate is
    /// exactly optimal for the current data.
    pub fn bound_drift_correction(&mut self) {
        for i in 0..self.n {
            match self.bounds.get_status(i) {
                SubjectToStatus::Lower => {
                    self.lb[i] = self.x[i];
                    self.ub[i] = T::max(self.ub[i], self.x[i]);
                }
                SubjectToStatus::Upper => {
                    self.ub[i] = self.x[i];
                    self.lb[i] = T::min(self.lb[i], self.x[i]);
                }
                _ => {
                    self.lb[i] = T::min(self.lb[i], self.x[i]);
                    self.ub[i] = T::max(self.ub[i], self.x[i]);
                    self.y[i] = T::zero();
                }
            }
        }
    }

    // ---------------------------------
    // solution
    // ---------------------------------

    /// Objective value using the Hessian without regularisation
    pub fn objective_value(&self) -> T {
        let half: T = (0.5).as_T();
        let g = if self.status == QPStatus::Solved {
            &self.g_user
        } else {
            &self.g
        };
        let quad = self.H.quad_form(&self.x, &self.x) - self.reg_val * self.x.sumsq();
        half * quad + g.dot(&self.x)
    }

    /// Working set as +1 (lower), -1 (upper), 0 for the bounds
    pub fn bound_working_set(&self, ws: &mut [i8]) {
        for (i, w) in ws.iter_mut().enumerate().take(self.n) {
            *w = self.bounds.get_status(i).sign();
        }
    }

    pub fn update_info(&mut self, status: SolverStatus, iterations: u32, solve_time: f64) {
        self.info.status = status;
        self.info.qp_status = self.status;
        self.info.iterations = iterations;
        self.info.total_iterations = self.iter_count;
        self.info.solve_time = solve_time;
        self.info.objective = self.objective_value();
        self.info.n_free = self.bounds.n_free();
        self.info.n_fixed = self.bounds.n_fixed();
        self.info.regularisation = self.reg_val;
    }
}

/// Sign and complementarity violation of one multiplier.  `slack_l`
/// and `slack_u` are the distances to the lower and upper side.
pub(crate) fn multiplier_violation<T: FloatT>(
    status: SubjectToStatus,
    ty: SubjectToType,
    y: T,
    slack_l: T,
    slack_u: T,
) -> (T, T) {
    match status {
        SubjectToStatus::Lower | SubjectToStatus::Upper if ty == SubjectToType::Equality => {
            (T::zero(), T::zero())
        }
        SubjectToStatus::Lower => (T::max(-y, T::zero()), (y * slack_l).abs()),
        SubjectToStatus::Upper => (T::max(y, T::zero()), (y * slack_u).abs()),
        _ => (y.abs(), T::zero()),
    }
}

/// New current range of a bound or constraint, see
/// [`HomotopyCore::bound_data_shift`].
pub(crate) fn shift_free_range<T: FloatT>(
    (mut l, mut u): (T, T),
    (lt, ut): (T, T),
    v: T,
    inf: T,
    relax: T,
) -> (T, T) {
    if lt <= -inf {
        l = lt;
    } else if l <= -inf {
        l = T::min(lt, v - relax);
    }
    if ut >= inf {
        u = ut;
    } else if u >= inf {
        u = T::max(ut, v + relax);
    }
    (l, u)
}

/// `target - current`, or zero when the target is infinite
#[inline]
pub(crate) fn finite_delta<T: FloatT>(target: T, current: T, inf: T) -> T {
    if target <= -inf || target >= inf {
        T::zero()
    } else {
        target - current
    }
}

#[inline]
pub(crate) fn relative_distance<T: FloatT>(target: T, current: T) -> T {
    (target - current).abs() / T::max(T::one(), target.abs())
}

// ---------------------------------
// homotopy driver
// ---------------------------------

/// The steps of one homotopy iteration.  Implemented by the bounded
/// and the constrained engines, driven by [`run_homotopy`].
pub(crate) trait HomotopyEngine<T: FloatT> {
    fn core(&self) -> &HomotopyCore<T>;
    fn core_mut(&mut self) -> &mut HomotopyCore<T>;
    fn split_mut(&mut self) -> (&mut HomotopyCore<T>, &mut Workspace<T>);

    /// lower and upper target data do not cross
    fn targets_consistent(&self) -> bool;
    /// working set adjustments made once before iterating
    fn prepare_homotopy(&mut self) -> HaltResult;
    /// differences between target and current data
    fn determine_data_shift(&mut self);
    fn determine_step_direction(&mut self) -> HaltResult;
    fn ratio_test(&mut self) -> (T, Option<Blocking>);
    fn perform_step(&mut self, tau: T);
    fn homotopy_length(&self) -> T;
    fn change_active_set(&mut self, blocking: Blocking) -> HaltResult;
    /// recompute factorisations from scratch
    fn refactorise(&mut self) -> HaltResult;
    fn drift_correction(&mut self);
    fn n_active(&self) -> usize;
}

/// Runs the homotopy towards the target data held in the workspace.
///
/// `iterations` counts working set changes and is incremented in
/// place, so that several homotopies can share one budget.
pub(crate) fn run_homotopy<T, E>(
    engine: &mut E,
    max_iter: u32,
    budget: &mut TimeBudget,
    iterations: &mut u32,
) -> HaltResult<SolverStatus>
where
    T: FloatT,
    E: HomotopyEngine<T>,
{
    if !engine.targets_consistent() {
        engine.core_mut().print_warning("lower bound data exceeds upper bound data");
        return Ok(SolverStatus::Infeasible);
    }

    engine.core_mut().cycling.clear();
    if engine.core().factor_stale {
        engine.refactorise()?;
        engine.drift_correction();
        engine.core_mut().factor_stale = false;
    }
    engine.prepare_homotopy()?;

    loop {
        // a stop leaves no working set change pending
        if *iterations >= max_iter {
            engine.core_mut().status = QPStatus::HomotopyQPSolved;
            return Ok(SolverStatus::MaxIterations);
        }
        engine.core_mut().status = QPStatus::PerformingHomotopy;

        engine.determine_data_shift();
        engine.determine_step_direction()?;
        let (tau, blocking) = engine.ratio_test();
        engine.perform_step(tau);

        let len = engine.homotopy_length();
        let n_active = engine.n_active();
        {
            let core = engine.core_mut();
            core.info.tau = tau;
            core.info.homotopy_length = len;
            core.print_iteration(*iterations, tau, len, blocking.as_ref(), n_active);
        }

        let blocking = match blocking {
            Some(b) if len > engine.core().settings.termination_tolerance => b,
            _ => {
                engine.core_mut().status = QPStatus::Solved;
                return Ok(SolverStatus::Solved);
            }
        };

        engine.change_active_set(blocking)?;
        *iterations += 1;

        let core = engine.core_mut();
        core.iter_count += 1;
        core.status = QPStatus::HomotopyQPSolved;
        let count = core.iter_count;
        let refactor = core.settings.enable_cholesky_refactorisation;
        let drift = core.settings.enable_drift_correction;

        if refactor > 0 && count % refactor == 0 {
            engine.refactorise()?;
        }
        if drift > 0 && count % drift == 0 {
            engine.drift_correction();
        }

        budget.record_iteration();
        if budget.exhausted() {
            return Ok(SolverStatus::MaxTime);
        }
    }
}

/// Turns an early exit into an ordinary outcome where possible.  After
/// an error the factorisations are rebuilt by the next call.
fn settle<T: FloatT>(
    core: &mut HomotopyCore<T>,
    result: HaltResult<SolverStatus>,
) -> Result<SolverStatus, QPError> {
    match result {
        Ok(status) => Ok(status),
        Err(Halt::Stop(status)) => Ok(status),
        Err(Halt::Error(e)) => {
            core.factor_stale = true;
            if core.status == QPStatus::PerformingHomotopy {
                core.status = QPStatus::HomotopyQPSolved;
            }
            Err(e)
        }
    }
}

/// Runs the homotopy towards the targets held in the workspace, then
/// the proximal re-solves of a regularised problem, and records the
/// outcome in the engine info.
pub(crate) fn solve_homotopy<T, E>(
    engine: &mut E,
    budget: &SolveBudget,
    mut time_budget: TimeBudget,
) -> Result<QPSolveResult, QPError>
where
    T: FloatT,
    E: HomotopyEngine<T>,
{
    let max_iter = budget.max_iter.unwrap_or(engine.core().settings.max_iter);
    let mut iterations = 0;

    let result = run_homotopy(engine, max_iter, &mut time_budget, &mut iterations);
    let mut status = settle(engine.core_mut(), result)?;

    let steps = engine.core().settings.num_regularisation_steps;
    if status == SolverStatus::Solved && engine.core().reg_val > T::zero() {
        for _ in 0..steps {
            if iterations >= max_iter {
                break;
            }
            let (core, work) = engine.split_mut();
            core.proximal_gradient(&mut work.g_target);
            let result = run_homotopy(engine, max_iter, &mut time_budget, &mut iterations);
            status = settle(engine.core_mut(), result)?;
            if status != SolverStatus::Solved {
                break;
            }
        }
    }

    let solve_time = time_budget.elapsed();
    let n_active = engine.n_active();
    let core = engine.core_mut();
    core.update_info(status, iterations, solve_time);
    core.info.n_active = n_active;
    core.print_footer(status, iterations, solve_time);

    Ok(QPSolveResult {
        status,
        iterations,
        solve_time,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_relative_distance() {
        assert_eq!(relative_distance(4.0, 2.0), 0.5);
        assert_eq!(relative_distance(0.5, 0.0), 0.5);
    }

    #[test]
    fn test_shift_free_range() {
        let inf = 1e20;
        // finite target for an infinite side: pulled in below x
        let (l, u) = shift_free_range((-inf, 3.0), (1.0, 4.0), 2.0, inf, 10.0);
        assert_eq!((l, u), (-8.0, 3.0));
        // infinite target replaces the current value
        let (l, u) = shift_free_range((0.0, 3.0), (-inf, inf), 2.0, inf, 10.0);
        assert_eq!((l, u), (-inf, inf));
        assert_eq!(finite_delta(-inf, 0.0, inf), 0.0);
        assert_eq!(finite_delta(2.0, 0.5, inf), 1.5);
    }

    #[test]
    fn test_multiplier_violation() {
        let (s, c) = multiplier_violation(
            SubjectToStatus::Lower,
            SubjectToType::Bounded,
            -2.0,
            0.5,
            1.0,
        );
        assert_eq!((s, c), (2.0, 1.0));
        let (s, _) = multiplier_violation(
            SubjectToStatus::Lower,
            SubjectToType::Equality,
            -2.0,
            0.0,
            0.0,
        );
        assert_eq!(s, 0.0);
        let (s, c) = multiplier_violation(
            SubjectToStatus::Inactive,
            SubjectToType::Bounded,
            -0.25,
            1.0,
            1.0,
        );
        assert_eq!((s, c), (0.25, 0.0));
    }
}
