use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Counts events and reports their mean rate since creation.
#[derive(Debug)]
pub struct Meter {
    count: AtomicU64,
    started: Instant,
}

impl Meter {
    pub fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub fn mark(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Events per second.
    pub fn mean_rate(&self) -> f64 {
        self.mean_rate_at(Instant::now())
    }

    fn mean_rate_at(&self, now: Instant) -> f64 {
        let elapsed = now.duration_since(self.started).as_secs_f64();
        if elapsed == 0.0 {
            return 0.0;
        }
        self.count() as f64 / elapsed
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets an action through at most once per period.
#[derive(Debug)]
pub struct Throttle {
    period: Duration,
    last: Mutex<Instant>,
}

impl Throttle {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last: Mutex::new(Instant::now()),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true and restarts the period when it has elapsed.
    pub fn advance_if_elapsed(&self) -> bool {
        self.advance_if_elapsed_at(Instant::now())
    }

    fn advance_if_elapsed_at(&self, now: Instant) -> bool {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if now.duration_since(*last) >= self.period {
            *last += self.period;
            // don't replay every missed period after a long stall
            if now.duration_since(*last) >= self.period {
                *last = now;
            }
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_counts_marks() {
        let meter = Meter::new();
        meter.mark();
        meter.mark();
        assert_eq!(meter.count(), 2);
    }

    #[test]
    fn test_meter_mean_rate() {
        let meter = Meter::new();
        for _ in 0..30 {
            meter.mark();
        }
        let rate = meter.mean_rate_at(meter.started + Duration::from_secs(2));
        assert_eq!(rate, 15.0);
        assert_eq!(meter.mean_rate_at(meter.started), 0.0);
    }

    #[test]
    fn test_throttle_once_per_period() {
        let throttle = Throttle::new(Duration::from_secs(5));
        let start = *throttle.last.lock().unwrap();
        assert!(!throttle.advance_if_elapsed_at(start + Duration::from_secs(1)));
        assert!(throttle.advance_if_elapsed_at(start + Duration::from_secs(5)));
        assert!(!throttle.advance_if_elapsed_at(start + Duration::from_secs(6)));
        assert!(throttle.advance_if_elapsed_at(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_throttle_skips_missed_periods() {
        let throttle = Throttle::new(Duration::from_secs(5));
        let start = *throttle.last.lock().unwrap();
        assert!(throttle.advance_if_elapsed_at(start + Duration::from_secs(60)));
        assert!(!throttle.advance_if_elapsed_at(start + Duration::from_secs(61)));
    }
}
