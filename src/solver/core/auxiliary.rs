use super::*;
use crate::algebra::*;

// ---------------------------------
// auxiliary QP
// ---------------------------------
//
// `init` starts from a QP whose solution is known by construction:
// the data is chosen around the starting point so that the starting
// point and the guessed working set are optimal.  The homotopy then
// carries that solution over to the user's QP.

/// Status of a bound or constraint in the auxiliary QP.
///
/// Explicit statuses take precedence over the sign of the dual guess,
/// which takes precedence over the position of the primal guess.
/// Sides that are infinite in the target data are never activated.
#[allow(clippy::too_many_arguments)]
pub(crate) fn guess_status<T: FloatT>(
    ty: SubjectToType,
    (lower, upper): (T, T),
    explicit: Option<SubjectToStatus>,
    y: Option<T>,
    v: Option<T>,
    default: SubjectToStatus,
    inf: T,
    tol: T,
) -> SubjectToStatus {
    let resolve = |s: SubjectToStatus| match s {
        SubjectToStatus::Lower if lower > -inf => SubjectToStatus::Lower,
        SubjectToStatus::Upper if upper < inf => SubjectToStatus::Upper,
        _ => SubjectToStatus::Inactive,
    };

    match ty {
        SubjectToType::Unbounded => SubjectToStatus::Inactive,
        SubjectToType::Equality => SubjectToStatus::Lower,
        _ => {
            if let Some(s) = explicit {
                resolve(s)
            } else if let Some(y) = y {
                if y > T::zero() {
                    resolve(SubjectToStatus::Lower)
                } else if y < T::zero() {
                    resolve(SubjectToStatus::Upper)
                } else {
                    SubjectToStatus::Inactive
                }
            } else if let Some(v) = v {
                if v <= lower + tol {
                    resolve(SubjectToStatus::Lower)
                } else if v >= upper - tol {
                    resolve(SubjectToStatus::Upper)
                } else {
                    SubjectToStatus::Inactive
                }
            } else {
                resolve(default)
            }
        }
    }
}

/// Auxiliary lower and upper values around `v` that make `status`
/// optimal.  Infinite target sides stay infinite.
pub(crate) fn auxiliary_range<T: FloatT>(
    status: SubjectToStatus,
    ty: SubjectToType,
    v: T,
    (lt, ut): (T, T),
    inf: T,
    relax: T,
) -> (T, T) {
    let below = if lt > -inf { v - relax } else { -inf };
    let above = if ut < inf { v + relax } else { inf };
    let equality = ty == SubjectToType::Equality;
    match status {
        SubjectToStatus::Inactive => (below, above),
        SubjectToStatus::Lower => (v, if equality { v } else { above }),
        SubjectToStatus::Upper => (if equality { v } else { below }, v),
        SubjectToStatus::Disabled | SubjectToStatus::Disabling => (lt, ut),
    }
}

/// Multiplier consistent with `status`
pub(crate) fn clamp_multiplier<T: FloatT>(status: SubjectToStatus, ty: SubjectToType, y: T) -> T {
    match status {
        _ if status.is_active() && ty == SubjectToType::Equality => y,
        SubjectToStatus::Lower => T::max(y, T::zero()),
        SubjectToStatus::Upper => T::min(y, T::zero()),
        _ => T::zero(),
    }
}

/// Which parts of a starting point were supplied by the caller
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GuessSource {
    pub x: bool,
    pub y: bool,
}

impl<T> HomotopyCore<T>
where
    T: FloatT,
{
    /// Checks the dimensions of a starting point and that no status
    /// asks for a disabled constraint.
    pub fn validate_statuses(&self, guess: &InitialGuess<T>) -> Result<(), QPError> {
        let valid = |s: &SubjectToStatus| {
            !matches!(s, SubjectToStatus::Disabled | SubjectToStatus::Disabling)
        };
        if let Some(b) = guess.bounds {
            check_dimension("bounds guess", self.n, b.len())?;
            if !b.iter().all(valid) {
                return Err(QPError::InvalidArgument("bounds can not be guessed as disabled"));
            }
        }
        if let Some(c) = guess.constraints {
            check_dimension("constraints guess", self.m, c.len())?;
            if !c.iter().all(valid) {
                return Err(QPError::InvalidArgument(
                    "constraints can not be guessed as disabled",
                ));
            }
        }
        Ok(())
    }

    /// Checks a starting point and copies its primal and dual parts
    /// into the iterate.  Absent parts are zero.
    pub fn load_guess(&mut self, guess: &InitialGuess<T>) -> Result<GuessSource, QPError> {
        if let Some(x) = guess.x {
            check_dimension("x guess", self.n, x.len())?;
        }
        if let Some(y) = guess.y {
            check_dimension("y guess", self.n + self.m, y.len())?;
        }
        self.validate_statuses(guess)?;

        match guess.x {
            Some(x) => self.x.copy_from(x),
            None => self.x.set(T::zero()),
        };
        match guess.y {
            Some(y) => self.y.copy_from(y),
            None => self.y.set(T::zero()),
        };
        Ok(GuessSource {
            x: guess.x.is_some(),
            y: guess.y.is_some(),
        })
    }

    /// Builds the bound working set of the auxiliary QP.  The bound
    /// types must already describe the target data.
    pub fn install_bound_statuses(
        &mut self,
        work: &Workspace<T>,
        explicit: Option<&[SubjectToStatus]>,
        source: GuessSource,
    ) -> Result<(), QPError> {
        for i in 0..self.n {
            let status = guess_status(
                self.bounds.get_type(i),
                (work.lb_target[i], work.ub_target[i]),
                explicit.map(|s| s[i]),
                source.y.then(|| self.y[i]),
                source.x.then(|| self.x[i]),
                self.settings.initial_status_bounds,
                self.inf,
                self.settings.bound_tolerance,
            );
            if status.is_active() {
                self.bounds.move_free_to_fixed(i, status)?;
            }
        }
        Ok(())
    }

    /// Sets the current bound data and bound multipliers so that the
    /// iterate is optimal for the bound working set.
    pub fn setup_auxiliary_bounds(&mut self, work: &Workspace<T>) {
        let relax = self.settings.bound_relaxation;
        for i in 0..self.n {
            let status = self.bounds.get_status(i);
            let ty = self.bounds.get_type(i);
            (self.lb[i], self.ub[i]) = auxiliary_range(
                status,
                ty,
                self.x[i],
                (work.lb_target[i], work.ub_target[i]),
                self.inf,
                relax,
            );
            self.y[i] = clamp_multiplier(status, ty, self.y[i]);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const INF: f64 = 1e20;
    const TOL: f64 = 1e-10;

    fn guess(
        ty: SubjectToType,
        range: (f64, f64),
        explicit: Option<SubjectToStatus>,
        y: Option<f64>,
        v: Option<f64>,
    ) -> SubjectToStatus {
        guess_status(ty, range, explicit, y, v, SubjectToStatus::Lower, INF, TOL)
    }

    #[test]
    fn test_guess_precedence() {
        let b = SubjectToType::Bounded;
        // explicit beats dual beats primal
        assert_eq!(
            guess(b, (0., 1.), Some(SubjectToStatus::Upper), Some(1.), Some(0.)),
            SubjectToStatus::Upper
        );
        assert_eq!(
            guess(b, (0., 1.), None, Some(-1.), Some(0.)),
            SubjectToStatus::Upper
        );
        assert_eq!(guess(b, (0., 1.), None, None, Some(1.)), SubjectToStatus::Upper);
        assert_eq!(guess(b, (0., 1.), None, None, Some(0.5)), SubjectToStatus::Inactive);
        assert_eq!(guess(b, (0., 1.), None, None, None), SubjectToStatus::Lower);

        // infinite sides are never activated
        assert_eq!(guess(b, (-INF, 1.), None, None, None), SubjectToStatus::Inactive);
        assert_eq!(
            guess(SubjectToType::Unbounded, (-INF, INF), None, Some(1.), None),
            SubjectToStatus::Inactive
        );
        assert_eq!(
            guess(SubjectToType::Equality, (2., 2.), None, None, None),
            SubjectToStatus::Lower
        );
    }

    #[test]
    fn test_auxiliary_range() {
        let b = SubjectToType::Bounded;
        let r = auxiliary_range(SubjectToStatus::Inactive, b, 1.0, (0.0, INF), INF, 10.0);
        assert_eq!(r, (-9.0, INF));
        let r = auxiliary_range(SubjectToStatus::Lower, b, 1.0, (0.0, 5.0), INF, 10.0);
        assert_eq!(r, (1.0, 11.0));
        let r = auxiliary_range(SubjectToStatus::Upper, b, 1.0, (-INF, 5.0), INF, 10.0);
        assert_eq!(r, (-INF, 1.0));
        let r = auxiliary_range(
            SubjectToStatus::Lower,
            SubjectToType::Equality,
            1.0,
            (0.0, 0.0),
            INF,
            10.0,
        );
        assert_eq!(r, (1.0, 1.0));
    }

    #[test]
    fn test_clamp_multiplier() {
        let b = SubjectToType::Bounded;
        assert_eq!(clamp_multiplier(SubjectToStatus::Lower, b, -1.0), 0.0);
        assert_eq!(clamp_multiplier(SubjectToStatus::Upper, b, -1.0), -1.0);
        assert_eq!(clamp_multiplier(SubjectToStatus::Inactive, b, 3.0), 0.0);
        assert_eq!(
            clamp_multiplier(SubjectToStatus::Lower, SubjectToType::Equality, -1.0),
            -1.0
        );
    }
}
