use super::Instant;

/// Wall clock budget for a homotopy solve.
///
/// Keeps an exponentially weighted estimate of the time taken per
/// iteration, and declares the budget exhausted when the time used so
/// far plus one more estimated iteration would exceed the limit.
#[derive(Debug, Clone)]
pub(crate) struct TimeBudget {
    start: Instant,
    last: Instant,
    limit: f64,
    weight: f64,
    per_iteration: Option<f64>,
}

impl TimeBudget {
    /// `limit` in seconds, possibly infinite.  `weight` in (0,1] is the
    /// weight given to the most recent iteration.
    pub fn new(limit: f64, weight: f64) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            limit,
            weight: weight.clamp(f64::EPSILON, 1.0),
            per_iteration: None,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn record_iteration(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        self.per_iteration = Some(match self.per_iteration {
            None => dt,
            Some(avg) => self.weight * dt + (1.0 - self.weight) * avg,
        });
    }

    pub fn estimate(&self) -> f64 {
        self.per_iteration.unwrap_or(0.0)
    }

    pub fn exhausted(&self) -> bool {
        if !self.limit.is_finite() {
            return false;
        }
        self.elapsed() + self.estimate() > self.limit
    }
}

#[test]
fn test_time_budget() {
    let mut budget = TimeBudget::new(f64::INFINITY, 0.5);
    budget.record_iteration();
    assert!(!budget.exhausted());
    assert!(budget.estimate() >= 0.0);

    let budget = TimeBudget::new(0.0, 0.5);
    std::thread::sleep(std::time::Duration::from_millis(1));
    assert!(budget.exhausted());
}
