use super::subjectto::classify;
use super::*;
use crate::algebra::FloatT;

const FREE: usize = 0;
const FIXED: usize = 1;

/// Bounds are either free or fixed at one of their sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundPartitioning;

impl Partitioning for BoundPartitioning {
    fn partition(status: SubjectToStatus) -> Result<usize, WorkingSetError> {
        match status {
            SubjectToStatus::Inactive => Ok(FREE),
            SubjectToStatus::Lower | SubjectToStatus::Upper => Ok(FIXED),
            SubjectToStatus::Disabled | SubjectToStatus::Disabling => {
                Err(WorkingSetError::BadTransition)
            }
        }
    }
    fn ordered(partition: usize) -> bool {
        // free list positions are tied to columns of the Cholesky factor
        partition == FREE
    }
}

/// The `n` simple bounds `lb <= x <= ub`.
pub type Bounds = SubjectTo<BoundPartitioning>;

impl Bounds {
    pub fn free(&self) -> &IndexList {
        self.partition(FREE)
    }

    pub fn fixed(&self) -> &IndexList {
        self.partition(FIXED)
    }

    pub fn n_free(&self) -> usize {
        self.free().len()
    }

    pub fn n_fixed(&self) -> usize {
        self.fixed().len()
    }

    /// Classifies every bound from its lower and upper values.
    pub fn setup_types<T: FloatT>(
        &mut self,
        lb: &[T],
        ub: &[T],
        inf: T,
        tol: T,
        enable_equalities: bool,
    ) {
        for i in 0..self.len() {
            self.set_type(i, classify(lb[i], ub[i], inf, tol, enable_equalities));
        }
    }

    pub fn move_free_to_fixed(
        &mut self,
        i: usize,
        status: SubjectToStatus,
    ) -> Result<(), WorkingSetError> {
        if !self.free().contains(i) || !status.is_active() {
            return Err(WorkingSetError::BadTransition);
        }
        self.set_status(i, status)
    }

    pub fn move_fixed_to_free(&mut self, i: usize) -> Result<(), WorkingSetError> {
        if !self.fixed().contains(i) {
            return Err(WorkingSetError::NotPresent(i));
        }
        self.set_status(i, SubjectToStatus::Inactive)
    }

    /// Moves a fixed bound to its other side.
    pub fn flip_fixed(&mut self, i: usize) -> Result<(), WorkingSetError> {
        match self.get_status(i) {
            SubjectToStatus::Lower => self.set_status(i, SubjectToStatus::Upper),
            SubjectToStatus::Upper => self.set_status(i, SubjectToStatus::Lower),
            _ => Err(WorkingSetError::BadTransition),
        }
    }
}
