//! Working set bookkeeping.
//!
//! Per-index types and statuses of the simple bounds and the general
//! constraints, the index partitions derived from them, and the short
//! event history used to detect cycling.

mod bounds;
mod constraints;
mod cycling;
mod indexlist;
mod subjectto;

pub use bounds::*;
pub use constraints::*;
pub use cycling::*;
pub use indexlist::*;
pub use subjectto::*;

use thiserror::Error;

/// Inconsistency between index lists and statuses.  Always a bug,
/// never a consequence of user data.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingSetError {
    #[error("index {0} is already in the list")]
    AlreadyPresent(usize),
    #[error("index {0} is not in the list")]
    NotPresent(usize),
    #[error("index {index} exceeds capacity {capacity}")]
    OutOfRange { index: usize, capacity: usize },
    #[error("status change not allowed")]
    BadTransition,
}

impl WorkingSetError {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            WorkingSetError::AlreadyPresent(_) => "index added twice to a partition",
            WorkingSetError::NotPresent(_) => "index removed from a partition it is not in",
            WorkingSetError::OutOfRange { .. } => "index out of range",
            WorkingSetError::BadTransition => "invalid status transition",
        }
    }
}
