/// Involvement of an index in the most recent working set changes

#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub enum CyclingStatus {
    NotInvolved,
    PrevAdded,
    PrevRemoved,
}

#[derive(PartialEq, Eq, Clone, Debug, Copy)]
struct CyclingEvent {
    index: usize,
    is_bound: bool,
    status: CyclingStatus,
}

/// History of the two most recent additions or removals made while
/// restoring linear independence of the working set.
#[derive(Debug, Clone, Default)]
pub struct CyclingManager {
    events: [Option<CyclingEvent>; 2],
}

impl CyclingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events = [None, None];
    }

    /// Records an event, discarding the oldest one.  An index already
    /// in the history has its entry replaced.
    pub fn record_event(&mut self, index: usize, is_bound: bool, status: CyclingStatus) {
        let event = CyclingEvent {
            index,
            is_bound,
            status,
        };
        let same = |e: &Option<CyclingEvent>| {
            matches!(e, Some(ev) if ev.index == index && ev.is_bound == is_bound)
        };
        if same(&self.events[0]) {
            self.events[0] = Some(event);
        } else if same(&self.events[1]) {
            self.events[1] = Some(event);
        } else {
            self.events[1] = self.events[0];
            self.events[0] = Some(event);
        }
    }

    pub fn status(&self, index: usize, is_bound: bool) -> CyclingStatus {
        self.events
            .iter()
            .flatten()
            .find(|e| e.index == index && e.is_bound == is_bound)
            .map_or(CyclingStatus::NotInvolved, |e| e.status)
    }

    /// Removing `index` now would undo the most recent addition.
    pub fn is_cycling(&self, index: usize, is_bound: bool) -> bool {
        self.status(index, is_bound) == CyclingStatus::PrevAdded
    }
}

#[test]
fn test_cycling_history() {
    let mut c = CyclingManager::new();
    assert_eq!(c.status(0, true), CyclingStatus::NotInvolved);

    c.record_event(3, false, CyclingStatus::PrevAdded);
    c.record_event(1, true, CyclingStatus::PrevRemoved);
    assert!(c.is_cycling(3, false));
    assert!(!c.is_cycling(3, true));
    assert_eq!(c.status(1, true), CyclingStatus::PrevRemoved);

    // only two events are remembered
    c.record_event(5, true, CyclingStatus::PrevAdded);
    assert_eq!(c.status(3, false), CyclingStatus::NotInvolved);
    assert!(c.is_cycling(5, true));

    // re-recording an index replaces its entry
    c.record_event(1, true, CyclingStatus::PrevAdded);
    assert!(c.is_cycling(1, true));
    assert!(c.is_cycling(5, true));

    c.clear();
    assert_eq!(c.status(5, true), CyclingStatus::NotInvolved);
}
