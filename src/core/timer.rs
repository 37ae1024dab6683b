//! Explicit cancellable deadlines for the controller loop.

use std::time::{Duration, Instant};

/// A one-shot deadline tied to the show-cycle that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CancellableTimer {
    armed: Option<(Instant, u64)>,
}

impl CancellableTimer {
    pub fn arm(&mut self, now: Instant, delay: Duration, cycle: u64) {
        self.armed = Some((now + delay, cycle));
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|(deadline, _)| deadline)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Disarm and return the owning cycle once the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<u64> {
        match self.armed {
            Some((deadline, cycle)) if now >= deadline => {
                self.armed = None;
                Some(cycle)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_deadline() {
        let start = Instant::now();
        let mut timer = CancellableTimer::default();
        timer.arm(start, Duration::from_millis(100), 4);

        assert_eq!(timer.fire_if_due(start + Duration::from_millis(99)), None);
        assert_eq!(timer.fire_if_due(start + Duration::from_millis(100)), Some(4));
        assert_eq!(timer.fire_if_due(start + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_cancel_disarms() {
        let start = Instant::now();
        let mut timer = CancellableTimer::default();
        timer.arm(start, Duration::from_millis(1), 1);
        timer.cancel();
        assert!(!timer.is_armed());
        assert_eq!(timer.fire_if_due(start + Duration::from_secs(1)), None);
    }
}
