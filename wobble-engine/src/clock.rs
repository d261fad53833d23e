//! Time sources for the animation loop.

use std::time::{Duration, Instant};

pub trait Clock {
    /// Milliseconds since the clock was created.
    fn now_ms(&self) -> u64;

    fn sleep_ms(&mut self, ms: u32);
}

/// Wall clock: monotonic `Instant` plus a real thread sleep.
#[derive(Copy, Clone, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self { Self { start: Instant::now() } }
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn sleep_ms(&mut self, ms: u32) {
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

/// Simulated clock; time only moves on `sleep_ms` or `advance`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ManualClock {
    now: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self { Self { now: start_ms } }

    pub fn advance(&mut self, ms: u64) { self.now = self.now.saturating_add(ms); }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 { self.now }

    fn sleep_ms(&mut self, ms: u32) { self.advance(u64::from(ms)); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_when_told() {
        let mut c = ManualClock::new(10);
        assert_eq!(c.now_ms(), 10);
        c.sleep_ms(50);
        c.advance(5);
        assert_eq!(c.now_ms(), 65);
        c.advance(u64::MAX);
        assert_eq!(c.now_ms(), u64::MAX);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut c = SystemClock::new();
        let a = c.now_ms();
        c.sleep_ms(2);
        assert!(c.now_ms() >= a + 1);
    }
}
