//! Accelerated wall-clock replay time

use super::Clock;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::time::Instant;

/// Simulated start of the reference data set (2014-01-01 00:00:00 UTC)
pub const DEFAULT_EPOCH: i64 = 1_388_534_400;

/// Maps real elapsed time onto a simulated timeline.
///
/// Simulated time is `epoch + elapsed_real * acceleration`. An acceleration
/// of `3600.0` replays one simulated hour per real second.
#[derive(Debug, Clone)]
pub struct VirtualClock {
    start: Instant,
    epoch: DateTime<Utc>,
    acceleration: f64,
}

impl VirtualClock {
    /// Create a clock starting now at [`DEFAULT_EPOCH`]
    pub fn new(acceleration: f64) -> Self {
        let epoch = Utc
            .timestamp_opt(DEFAULT_EPOCH, 0)
            .single()
            .unwrap_or_default();
        Self::with_epoch(epoch, acceleration)
    }

    /// Create a clock starting now at the given simulated instant
    pub fn with_epoch(epoch: DateTime<Utc>, acceleration: f64) -> Self {
        Self {
            start: Instant::now(),
            epoch,
            acceleration,
        }
    }

    /// Simulated seconds per real second
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Simulated instant the clock started at
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    fn simulated_elapsed(&self) -> TimeDelta {
        let micros = self.start.elapsed().as_secs_f64() * self.acceleration * 1_000_000.0;
        // Saturates instead of wrapping once the replay runs past chrono's range
        TimeDelta::microseconds(micros.min(i64::MAX as f64) as i64)
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Utc> {
        self.epoch
            .checked_add_signed(self.simulated_elapsed())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_epoch() {
        let clock = VirtualClock::new(3600.0);
        assert_eq!(clock.epoch().to_rfc3339(), "2014-01-01T00:00:00+00:00");
        assert!(clock.now() >= clock.epoch());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = VirtualClock::new(18000.0);
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_acceleration_scales_elapsed_time() {
        let clock = VirtualClock::new(18000.0);
        std::thread::sleep(Duration::from_millis(20));

        // 20ms real at 18000x is at least 360 simulated seconds
        let elapsed = clock.now() - clock.epoch();
        assert!(elapsed >= TimeDelta::seconds(360));
    }

    #[test]
    fn test_custom_epoch() {
        let epoch = Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();
        let clock = VirtualClock::with_epoch(epoch, 1.0);
        let now = clock.now();
        assert!(now >= epoch);
        assert!(now - epoch < TimeDelta::seconds(5));
    }

    #[test]
    fn test_shared_across_threads() {
        let clock = std::sync::Arc::new(VirtualClock::new(3600.0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clock = clock.clone();
                std::thread::spawn(move || clock.now())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap() >= clock.epoch());
        }
    }
}
