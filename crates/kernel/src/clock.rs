use std::time::{Duration, Instant};

/// Free-running one-second interval, independent of the frame loop.
///
/// Callers poll with the current instant and get back how many whole
/// seconds elapsed since the last poll. Remainders carry over, so irregular
/// polling neither drops nor double-counts seconds.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    period: Duration,
    next_due: Instant,
}

impl IntervalClock {
    pub fn start(now: Instant) -> Self {
        let period = Duration::from_secs(1);
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Whole periods elapsed up to `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while now >= self.next_due {
            self.next_due += self.period;
            fired += 1;
        }
        fired
    }
}
