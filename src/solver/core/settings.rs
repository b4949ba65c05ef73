use super::SettingsError;
use crate::algebra::*;
use crate::solver::workingset::SubjectToStatus;
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Verbosity of an engine's diagnostic output

#[repr(u32)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrintLevel {
    /// no output at all
    None,
    /// header, footer and errors
    #[default]
    Low,
    /// one line per homotopy iteration
    Medium,
    /// every working set change
    High,
}

/// Settings shared by all QP engines.
///
/// Build with [`QPSettingsBuilder`] or start from one of the presets
/// [`default`](QPSettings::default), [`reliable`](QPSettings::reliable)
/// or [`mpc`](QPSettings::mpc).

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QPSettings<T: FloatT> {
    ///default homotopy iteration budget when none is given
    #[builder(default = "1000")]
    pub max_iter: u32,

    ///default time budget per call (seconds)
    #[builder(default = "f64::INFINITY")]
    pub time_limit: f64,

    ///diagnostic verbosity
    #[builder(default = "PrintLevel::Low")]
    pub print_level: PrintLevel,

    ///regularise zero and semidefinite Hessians
    #[builder(default = "true")]
    pub enable_regularisation: bool,

    ///proximal correction solves after convergence of a regularised QP
    #[builder(default = "0")]
    pub num_regularisation_steps: u32,

    ///regularisation scale, relative to the largest Hessian diagonal
    #[builder(default = "T::epsilon() * (1e3).as_T()")]
    pub eps_regularisation: T,

    ///relative homotopy length accepted as converged
    #[builder(default = "T::epsilon() * (5e6).as_T()")]
    pub termination_tolerance: T,

    ///tolerance for detecting equalities and active bounds
    #[builder(default = "T::epsilon() * (1e6).as_T()")]
    pub bound_tolerance: T,

    ///distance of inactive auxiliary bounds from the initial guess
    #[builder(default = "(1e4).as_T()")]
    pub bound_relaxation: T,

    ///ratio test numerator threshold
    #[builder(default = "T::epsilon() * (-1e3).as_T()")]
    pub eps_num: T,

    ///ratio test denominator threshold
    #[builder(default = "T::epsilon() * (1e3).as_T()")]
    pub eps_den: T,

    ///threshold of the linear independence test
    #[builder(default = "T::epsilon() * (1e5).as_T()")]
    pub eps_lin_independence: T,

    ///primal step size reported as a suspicious jump
    #[builder(default = "(1e8).as_T()")]
    pub max_primal_jump: T,

    ///dual step size reported as a suspicious jump
    #[builder(default = "(1e8).as_T()")]
    pub max_dual_jump: T,

    ///status of bounds in the auxiliary QP when nothing better is known
    #[builder(default = "SubjectToStatus::Lower")]
    pub initial_status_bounds: SubjectToStatus,

    ///treat bounds with lb == ub as equalities
    #[builder(default = "true")]
    pub enable_equalities: bool,

    ///refactorise the projected Hessian every k iterations (0 = never)
    #[builder(default = "0")]
    pub enable_cholesky_refactorisation: u32,

    ///recompute constraint residuals every k iterations (0 = never)
    #[builder(default = "1")]
    pub enable_drift_correction: u32,

    ///relative safety margin given to re-enabled constraints
    #[builder(default = "(1e-3).as_T()")]
    pub enabling_factor: T,

    ///absolute safety margin given to re-enabled constraints
    #[builder(default = "(1e-6).as_T()")]
    pub enabling_offset: T,

    ///weight of the latest iteration in the per-iteration time estimate
    #[builder(default = "0.5")]
    pub time_estimate_weight: f64,
}

impl<T> Default for QPSettings<T>
where
    T: FloatT,
{
    fn default() -> QPSettings<T> {
        QPSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> QPSettings<T>
where
    T: FloatT,
{
    /// Slower but more robust: refactorises and corrects drift at
    /// every iteration and takes proximal correction steps.
    pub fn reliable() -> Self {
        Self {
            enable_cholesky_refactorisation: 1,
            enable_drift_correction: 1,
            num_regularisation_steps: 2,
            ..Self::default()
        }
    }

    /// Tuned for fast, repeated solves inside control loops.
    pub fn mpc() -> Self {
        Self {
            print_level: PrintLevel::None,
            initial_status_bounds: SubjectToStatus::Inactive,
            enable_regularisation: true,
            enable_cholesky_refactorisation: 0,
            enable_drift_correction: 0,
            termination_tolerance: T::epsilon() * (1e9).as_T(),
            eps_regularisation: T::epsilon() * (5e3).as_T(),
            ..Self::default()
        }
    }

    /// Checks that numerical values are in their admissible ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_positive(self.termination_tolerance, "termination_tolerance")?;
        validate_positive(self.bound_tolerance, "bound_tolerance")?;
        validate_positive(self.bound_relaxation, "bound_relaxation")?;
        validate_positive(self.eps_den, "eps_den")?;
        validate_positive(self.eps_lin_independence, "eps_lin_independence")?;
        validate_nonnegative(self.eps_regularisation, "eps_regularisation")?;
        validate_nonnegative(self.enabling_factor, "enabling_factor")?;
        validate_nonnegative(self.enabling_offset, "enabling_offset")?;
        validate_initial_status(self.initial_status_bounds)?;
        validate_time_estimate_weight(self.time_estimate_weight)?;
        if self.eps_num > T::zero() {
            return Err(SettingsError::BadFieldValue("eps_num"));
        }
        if self.time_limit.is_nan() || self.time_limit < 0.0 {
            return Err(SettingsError::BadFieldValue("time_limit"));
        }
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for QPSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        QPSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> QPSettingsBuilder<T>
where
    T: FloatT,
{
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(status) = self.initial_status_bounds {
            validate_initial_status(status)?;
        }
        if let Some(w) = self.time_estimate_weight {
            validate_time_estimate_weight(w)?;
        }
        if let Some(v) = self.termination_tolerance {
            validate_positive(v, "termination_tolerance")?;
        }
        if let Some(v) = self.bound_relaxation {
            validate_positive(v, "bound_relaxation")?;
        }
        if let Some(v) = self.eps_den {
            validate_positive(v, "eps_den")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_positive<T: FloatT>(v: T, field: &'static str) -> Result<(), SettingsError> {
    if v > T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

fn validate_nonnegative<T: FloatT>(v: T, field: &'static str) -> Result<(), SettingsError> {
    if v >= T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue(field))
    }
}

fn validate_initial_status(status: SubjectToStatus) -> Result<(), SettingsError> {
    match status {
        SubjectToStatus::Inactive | SubjectToStatus::Lower | SubjectToStatus::Upper => Ok(()),
        _ => Err(SettingsError::BadFieldValue("initial_status_bounds")),
    }
}

fn validate_time_estimate_weight(w: f64) -> Result<(), SettingsError> {
    if w > 0.0 && w <= 1.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("time_estimate_weight"))
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings should be OK
    assert!(QPSettings::<f64>::default().validate().is_ok());
    assert!(QPSettings::<f64>::reliable().validate().is_ok());
    assert!(QPSettings::<f64>::mpc().validate().is_ok());

    // builder rejects bad values
    let settings = QPSettingsBuilder::<f64>::default()
        .initial_status_bounds(SubjectToStatus::Disabled)
        .build();
    assert!(settings.is_err());

    let settings = QPSettingsBuilder::<f64>::default()
        .time_estimate_weight(0.0)
        .build();
    assert!(settings.is_err());

    // direct modification is caught by validate
    let mut settings = QPSettings::<f64>::default();
    settings.eps_den = 0.0;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("eps_den"))
    );
}
