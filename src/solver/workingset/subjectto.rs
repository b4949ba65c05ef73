use super::{IndexList, WorkingSetError};
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of a bound or constraint, derived from its lower and upper values

#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubjectToType {
    /// both sides infinite
    Unbounded,
    /// at least one finite side
    Bounded,
    /// lower and upper coincide
    Equality,
    #[default]
    Unknown,
}

/// Position of a bound or constraint relative to the working set

#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubjectToStatus {
    #[default]
    Inactive,
    /// active at its lower side
    Lower,
    /// active at its upper side
    Upper,
    /// excluded from the problem
    Disabled,
    /// still active, to be removed from the working set and disabled
    Disabling,
}

impl SubjectToStatus {
    /// +1 at lower, -1 at upper, 0 otherwise
    pub fn sign(&self) -> i8 {
        match self {
            SubjectToStatus::Lower => 1,
            SubjectToStatus::Upper => -1,
            _ => 0,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SubjectToStatus::Lower | SubjectToStatus::Upper)
    }
}

/// Maps statuses onto one of three disjoint index partitions.
pub trait Partitioning {
    /// partition holding an index with the given status
    fn partition(status: SubjectToStatus) -> Result<usize, WorkingSetError>;
    /// whether removal from the partition must preserve member order
    fn ordered(partition: usize) -> bool;
}

/// Types and statuses of a family of bounds or constraints.
///
/// The status of every index determines the one partition it belongs
/// to, and partitions are only ever changed through
/// [`set_status`](SubjectTo::set_status), so the two can not drift apart.
#[derive(Debug, Clone)]
pub struct SubjectTo<P> {
    types: Vec<SubjectToType>,
    status: Vec<SubjectToStatus>,
    lists: [IndexList; 3],
    _partitioning: PhantomData<P>,
}

impl<P> SubjectTo<P>
where
    P: Partitioning,
{
    pub fn new(n: usize) -> Self {
        let mut s = Self {
            types: vec![SubjectToType::Unknown; n],
            status: vec![SubjectToStatus::Inactive; n],
            lists: [IndexList::new(n), IndexList::new(n), IndexList::new(n)],
            _partitioning: PhantomData,
        };
        s.reset();
        s
    }

    /// Unknown type and inactive status for every index
    pub fn reset(&mut self) {
        self.lists.iter_mut().for_each(|l| l.clear());
        self.types.fill(SubjectToType::Unknown);
        self.status.fill(SubjectToStatus::Inactive);

        // an inactive index always has a home partition
        if let Ok(p) = P::partition(SubjectToStatus::Inactive) {
            for i in 0..self.len() {
                let _ = self.lists[p].add(i);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    pub fn get_type(&self, i: usize) -> SubjectToType {
        self.types[i]
    }

    pub fn set_type(&mut self, i: usize, t: SubjectToType) {
        self.types[i] = t;
    }

    pub fn get_status(&self, i: usize) -> SubjectToStatus {
        self.status[i]
    }

    pub fn statuses(&self) -> &[SubjectToStatus] {
        &self.status
    }

    /// Changes the status of `i`, moving it between partitions as needed.
    pub fn set_status(&mut self, i: usize, status: SubjectToStatus) -> Result<(), WorkingSetError> {
        if i >= self.len() {
            return Err(WorkingSetError::OutOfRange {
                index: i,
                capacity: self.len(),
            });
        }
        let from = P::partition(self.status[i])?;
        let to = P::partition(status)?;

        if from != to {
            if P::ordered(from) {
                self.lists[from].remove(i)?;
            } else {
                self.lists[from].swap_remove(i)?;
            }
            self.lists[to].add(i)?;
        }
        self.status[i] = status;
        Ok(())
    }

    pub(crate) fn partition(&self, p: usize) -> &IndexList {
        &self.lists[p]
    }

    pub fn count_type(&self, t: SubjectToType) -> usize {
        self.types.iter().filter(|&&ti| ti == t).count()
    }

    /// Checks that every index sits in exactly the partition its
    /// status maps to.
    pub fn is_consistent(&self) -> bool {
        let total: usize = self.lists.iter().map(|l| l.len()).sum();
        if total != self.len() {
            return false;
        }
        (0..self.len()).all(|i| match P::partition(self.status[i]) {
            Ok(p) => self.lists[p].contains(i),
            Err(_) => false,
        })
    }
}

/// Classifies a pair of lower and upper values.
pub(crate) fn classify<T: crate::algebra::FloatT>(
    lower: T,
    upper: T,
    inf: T,
    tol: T,
    enable_equalities: bool,
) -> SubjectToType {
    if lower <= -inf && upper >= inf {
        SubjectToType::Unbounded
    } else if enable_equalities && (upper - lower).abs() <= tol {
        SubjectToType::Equality
    } else {
        SubjectToType::Bounded
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone)]
    struct TwoWay;
    impl Partitioning for TwoWay {
        fn partition(status: SubjectToStatus) -> Result<usize, WorkingSetError> {
            match status {
                SubjectToStatus::Inactive => Ok(0),
                SubjectToStatus::Lower | SubjectToStatus::Upper => Ok(1),
                _ => Err(WorkingSetError::BadTransition),
            }
        }
        fn ordered(partition: usize) -> bool {
            partition == 0
        }
    }

    #[test]
    fn test_status_moves_partition() {
        let mut s = SubjectTo::<TwoWay>::new(4);
        assert!(s.is_consistent());
        assert_eq!(s.partition(0).len(), 4);

        s.set_status(1, SubjectToStatus::Lower).unwrap();
        s.set_status(3, SubjectToStatus::Upper).unwrap();
        assert_eq!(s.partition(0).as_slice(), &[0, 2]);
        assert_eq!(s.partition(1).as_slice(), &[1, 3]);

        // lower -> upper stays within the same partition
        s.set_status(1, SubjectToStatus::Upper).unwrap();
        assert_eq!(s.partition(1).as_slice(), &[1, 3]);
        assert!(s.is_consistent());

        assert_eq!(
            s.set_status(0, SubjectToStatus::Disabled),
            Err(WorkingSetError::BadTransition)
        );
        assert!(s.is_consistent());

        s.reset();
        assert_eq!(s.partition(0).len(), 4);
        assert_eq!(s.get_type(0), SubjectToType::Unknown);
    }

    #[test]
    fn test_classify() {
        let inf = 1e20;
        let tol = 1e-10;
        assert_eq!(classify(-1e20, 1e20, inf, tol, true), SubjectToType::Unbounded);
        assert_eq!(classify(-1.0, 1e20, inf, tol, true), SubjectToType::Bounded);
        assert_eq!(classify(1.0, 1.0, inf, tol, true), SubjectToType::Equality);
        assert_eq!(classify(1.0, 1.0, inf, tol, false), SubjectToType::Bounded);
    }
}
