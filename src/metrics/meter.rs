use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// EWMA tick period. Rates only move on tick boundaries.
pub const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Exponentially-weighted moving average of a per-second rate.
#[derive(Debug, Clone)]
pub struct Ewma {
    alpha: f64,
    uncounted: i64,
    rate: f64,
    initialized: bool,
}

impl Ewma {
    /// Average over `window`, e.g. one minute for the classic `rate1`.
    pub fn new(window: Duration) -> Self {
        let alpha = 1.0 - (-TICK_INTERVAL.as_secs_f64() / window.as_secs_f64()).exp();
        Self {
            alpha,
            uncounted: 0,
            rate: 0.0,
            initialized: false,
        }
    }

    pub fn one_minute() -> Self {
        Self::new(Duration::from_secs(60))
    }

    pub fn update(&mut self, n: i64) {
        self.uncounted += n;
    }

    /// Fold the events seen since the last tick into the average.
    /// The first tick seeds the rate with the instantaneous value.
    pub fn tick(&mut self) {
        let instant = self.uncounted as f64 / TICK_INTERVAL.as_secs_f64();
        self.uncounted = 0;
        if self.initialized {
            self.rate += self.alpha * (instant - self.rate);
        } else {
            self.rate = instant;
            self.initialized = true;
        }
    }

    /// Events per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// Event counter with a one-minute moving rate.
///
/// Ticks lazily: every read or mark catches up on the 5 s ticks that have
/// elapsed since the last one, so `rate1` stays 0 until the first tick.
#[derive(Debug)]
pub struct Meter {
    inner: Mutex<MeterState>,
}

#[derive(Debug)]
struct MeterState {
    count: i64,
    rate1: Ewma,
    last_tick: Instant,
}

impl MeterState {
    fn tick_if_necessary(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_tick);
        let ticks = elapsed.as_nanos() / TICK_INTERVAL.as_nanos();
        for _ in 0..ticks {
            self.rate1.tick();
        }
        self.last_tick += TICK_INTERVAL * ticks as u32;
    }
}

impl Meter {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// Meter whose tick clock starts at `start` instead of now.
    pub(crate) fn started_at(start: Instant) -> Self {
        Self {
            inner: Mutex::new(MeterState {
                count: 0,
                rate1: Ewma::one_minute(),
                last_tick: start,
            }),
        }
    }

    pub fn mark(&self, n: i64) {
        self.mark_at(n, Instant::now());
    }

    pub(crate) fn mark_at(&self, n: i64, now: Instant) {
        let mut state = self.inner.lock();
        state.tick_if_necessary(now);
        state.count += n;
        state.rate1.update(n);
    }

    pub fn count(&self) -> i64 {
        self.inner.lock().count
    }

    /// One-minute moving rate in events per second.
    pub fn rate1(&self) -> f64 {
        self.rate1_at(Instant::now())
    }

    fn rate1_at(&self, now: Instant) -> f64 {
        let mut state = self.inner.lock();
        state.tick_if_necessary(now);
        state.rate1.rate()
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}
