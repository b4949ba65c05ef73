use super::subjectto::classify;
use super::*;
use crate::algebra::FloatT;

const ACTIVE: usize = 0;
const INACTIVE: usize = 1;
const DISABLED: usize = 2;

/// Constraints are active (possibly on their way to being disabled),
/// inactive, or disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintPartitioning;

impl Partitioning for ConstraintPartitioning {
    fn partition(status: SubjectToStatus) -> Result<usize, WorkingSetError> {
        match status {
            SubjectToStatus::Lower | SubjectToStatus::Upper | SubjectToStatus::Disabling => {
                Ok(ACTIVE)
            }
            SubjectToStatus::Inactive => Ok(INACTIVE),
            SubjectToStatus::Disabled => Ok(DISABLED),
        }
    }
    fn ordered(partition: usize) -> bool {
        // active list positions are tied to rows of T
        partition == ACTIVE
    }
}

/// The `m` general constraints `lbA <= A*x <= ubA`.
pub type Constraints = SubjectTo<ConstraintPartitioning>;

impl Constraints {
    pub fn active(&self) -> &IndexList {
        self.partition(ACTIVE)
    }

    pub fn inactive(&self) -> &IndexList {
        self.partition(INACTIVE)
    }

    pub fn disabled(&self) -> &IndexList {
        self.partition(DISABLED)
    }

    pub fn n_active(&self) -> usize {
        self.active().len()
    }

    pub fn n_inactive(&self) -> usize {
        self.inactive().len()
    }

    pub fn n_disabled(&self) -> usize {
        self.disabled().len()
    }

    /// Classifies every enabled constraint from its lower and upper values.
    pub fn setup_types<T: FloatT>(
        &mut self,
        lbA: &[T],
        ubA: &[T],
        inf: T,
        tol: T,
        enable_equalities: bool,
    ) {
        for j in 0..self.len() {
            if self.get_status(j) == SubjectToStatus::Disabled {
                continue;
            }
            self.set_type(j, classify(lbA[j], ubA[j], inf, tol, enable_equalities));
        }
    }

    pub fn move_inactive_to_active(
        &mut self,
        j: usize,
        status: SubjectToStatus,
    ) -> Result<(), WorkingSetError> {
        if !self.inactive().contains(j) || !status.is_active() {
            return Err(WorkingSetError::BadTransition);
        }
        self.set_status(j, status)
    }

    pub fn move_active_to_inactive(&mut self, j: usize) -> Result<(), WorkingSetError> {
        if !self.active().contains(j) {
            return Err(WorkingSetError::NotPresent(j));
        }
        self.set_status(j, SubjectToStatus::Inactive)
    }

    /// Marks an active constraint for removal and disabling.
    pub fn mark_disabling(&mut self, j: usize) -> Result<(), WorkingSetError> {
        if !self.get_status(j).is_active() {
            return Err(WorkingSetError::BadTransition);
        }
        self.set_status(j, SubjectToStatus::Disabling)
    }

    /// Disables an inactive constraint.
    pub fn move_inactive_to_disabled(&mut self, j: usize) -> Result<(), WorkingSetError> {
        if self.get_status(j) != SubjectToStatus::Inactive {
            return Err(WorkingSetError::BadTransition);
        }
        self.set_status(j, SubjectToStatus::Disabled)
    }

    pub fn move_disabled_to_inactive(&mut self, j: usize) -> Result<(), WorkingSetError> {
        if self.get_status(j) != SubjectToStatus::Disabled {
            return Err(WorkingSetError::BadTransition);
        }
        self.set_status(j, SubjectToStatus::Inactive)
    }
}
