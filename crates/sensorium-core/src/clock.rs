//! Time source for event timestamps and need decay.
//!
//! Agents read the current time through a `Clock` so that decay can be
//! driven deterministically in tests with a `ManualClock`.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, Utc};

/// Source of "now" for an agent.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Cloning produces a shared view, so a test can keep one handle and give
/// another to the agent.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward by whole and fractional seconds.
    pub fn advance_secs(&self, seconds: f64) {
        let micros = (seconds * 1_000_000.0).round() as i64;
        self.advance(TimeDelta::microseconds(micros));
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("manual clock lock poisoned");
        *now += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().expect("manual clock lock poisoned") = instant;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("manual clock lock poisoned")
    }
}

/// Seconds elapsed from `earlier` to `later` (negative if `later` is before).
pub fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_seconds() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_shared_view() {
        let clock = ManualClock::default();
        let view = clock.clone();
        let start = view.now();
        clock.advance_secs(10.0);
        assert!((seconds_between(start, view.now()) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn seconds_between_handles_fractions_and_sign() {
        let clock = ManualClock::default();
        let start = clock.now();
        clock.advance_secs(0.25);
        let later = clock.now();
        assert!((seconds_between(start, later) - 0.25).abs() < 1e-9);
        assert!((seconds_between(later, start) + 0.25).abs() < 1e-9);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
