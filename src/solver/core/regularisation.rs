use super::*;
use crate::algebra::*;

/// Classifies a Hessian from its entries.
///
/// Only diagonal matrices are classified completely.  A dense matrix
/// with a negative diagonal entry is indefinite, otherwise its type is
/// left `Unknown` and settled by the first Cholesky factorisation.
pub(crate) fn detect_hessian_type<T: FloatT>(H: &Matrix<T>) -> HessianType {
    if H.data.iter().all(|&v| v == T::zero()) {
        return HessianType::Zero;
    }
    let n = H.nrows();
    let diag = || (0..n).map(|i| H[(i, i)]);

    if diag().any(|d| d < T::zero()) {
        return HessianType::Indefinite;
    }
    if !H.is_diagonal() {
        return HessianType::Unknown;
    }
    if diag().all(|d| d == T::one()) {
        HessianType::Identity
    } else if diag().any(|d| d == T::zero()) {
        HessianType::Semidefinite
    } else {
        HessianType::PositiveDefinite
    }
}

impl<T> HomotopyCore<T>
where
    T: FloatT,
{
    /// Loads the Hessian, or builds it from the type hint when no
    /// matrix is given, and classifies it.  Any previous regularisation
    /// is discarded.  Nothing is changed if the Hessian is rejected.
    pub fn load_hessian(
        &mut self,
        H: Option<&Matrix<T>>,
        hint: HessianType,
    ) -> Result<(), QPError> {
        let hessian_type = self.check_hessian(H, hint)?;
        self.install_hessian(H, hessian_type);
        Ok(())
    }

    /// Validates a Hessian and returns its type, without loading it.
    pub fn check_hessian(
        &self,
        H: Option<&Matrix<T>>,
        hint: HessianType,
    ) -> Result<HessianType, QPError> {
        let detected = match H {
            Some(H) => {
                check_dimension("H (rows)", self.n, H.nrows())?;
                check_dimension("H (cols)", self.n, H.ncols())?;
                if !H.is_finite() {
                    return Err(QPError::InvalidArgument("Hessian has non-finite entries"));
                }
                let tol = T::epsilon() * (1000.).as_T() * T::max(T::one(), H.norm_inf());
                if !H.is_symmetric(tol) {
                    return Err(QPError::InvalidArgument("Hessian is not symmetric"));
                }
                detect_hessian_type(H)
            }
            None => match hint {
                HessianType::Zero => HessianType::Zero,
                HessianType::Identity => HessianType::Identity,
                _ => {
                    return Err(QPError::InvalidArgument(
                        "a Hessian matrix is required for this Hessian type",
                    ))
                }
            },
        };

        let hessian_type = match (hint, detected) {
            // a hint can only sharpen what the entries leave open
            (HessianType::PositiveDefinite, HessianType::Unknown) => HessianType::PositiveDefinite,
            (HessianType::Semidefinite, HessianType::Unknown) => HessianType::Semidefinite,
            (HessianType::PositiveDefiniteNullspace, HessianType::Unknown) => {
                HessianType::PositiveDefiniteNullspace
            }
            _ => detected,
        };
        match hessian_type {
            HessianType::Indefinite => Err(QPError::HessianIndefinite),
            t => Ok(t),
        }
    }

    /// Installs a Hessian accepted by [`check_hessian`](Self::check_hessian),
    /// regularising it if it is zero or semidefinite.
    pub fn install_hessian(&mut self, H: Option<&Matrix<T>>, hessian_type: HessianType) {
        match (H, hessian_type) {
            (Some(H), _) => {
                self.H.copy_from(H);
            }
            (None, HessianType::Identity) => self.H.set_identity(),
            (None, _) => {
                self.H.data.set(T::zero());
            }
        }
        self.reg_val = T::zero();
        self.hessian_type = hessian_type;

        if matches!(hessian_type, HessianType::Zero | HessianType::Semidefinite)
            && self.regularise_hessian()
        {
            self.print_regularisation();
        }
    }

    /// true if a regularisation may still be applied
    pub fn can_regularise(&self) -> bool {
        self.settings.enable_regularisation && self.reg_val == T::zero()
    }

    /// Adds `reg_val * I` to the Hessian.  The gradient is not touched;
    /// callers holding an iterate must shift it with
    /// [`shift_gradient_for_regularisation`](Self::shift_gradient_for_regularisation).
    pub fn regularise_hessian(&mut self) -> bool {
        if !self.can_regularise() {
            return false;
        }
        let maxdiag = self.H.max_abs_diag();
        self.reg_val = self.settings.eps_regularisation * T::max(T::one(), maxdiag);
        for i in 0..self.n {
            self.H[(i, i)] += self.reg_val;
        }
        self.hessian_type = HessianType::PositiveDefinite;
        true
    }

    /// Keeps the current iterate optimal after the Hessian has been
    /// shifted by `reg_val * I`.
    pub fn shift_gradient_for_regularisation(&mut self) {
        self.g.axpby(-self.reg_val, &self.x, T::one());
    }

    /// Minimum acceptable pivot of the Cholesky factor
    pub fn pivot_tol(&self) -> T {
        if self.reg_val > T::zero() {
            self.reg_val * (0.5).as_T()
        } else {
            let hundred: T = (100.).as_T();
            hundred * T::epsilon() * T::max(T::one(), self.H.max_abs_diag())
        }
    }

    /// Gradient of the next proximal re-solve, centred at the
    /// current iterate.
    pub fn proximal_gradient(&self, g_prox: &mut [T]) {
        g_prox.waxpby(T::one(), &self.g_user, -self.reg_val, &self.x);
    }
}
