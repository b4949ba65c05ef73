// package together all of the following and re-export
// in a partially flattened structure :
// : engine state and outcome enums
// : errors
// : user settings and solve information
// : the homotopy machinery shared by all engines

pub mod callbacks;

mod auxiliary;
mod errors;
mod homotopy;
mod info;
mod info_print;
mod regularisation;
mod settings;
mod status;
mod workspace;

pub use callbacks::ConstraintProduct;
pub use errors::{QPError, SettingsError};
pub use info::*;
pub use settings::*;
pub use status::*;

pub(crate) use auxiliary::*;
pub(crate) use callbacks::BoxedConstraintProduct;
pub(crate) use errors::{check_dimension, Halt, HaltResult};
pub(crate) use homotopy::*;
pub(crate) use workspace::Workspace;

// names used throughout the core implementation
use crate::solver::workingset::{SubjectToStatus, SubjectToType};
