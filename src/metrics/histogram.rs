use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::meter::Meter;
use super::sample::{Sample, SampleSnapshot, UniformSample};

/// Distribution of integer observations over a pluggable `Sample`.
pub struct Histogram {
    sample: Mutex<Box<dyn Sample>>,
}

impl Histogram {
    pub fn new(sample: impl Sample + 'static) -> Self {
        Self {
            sample: Mutex::new(Box::new(sample)),
        }
    }

    pub fn update(&self, value: i64) {
        self.sample.lock().update(value);
    }

    pub fn count(&self) -> u64 {
        self.sample.lock().count()
    }

    pub fn clear(&self) {
        self.sample.lock().clear();
    }

    /// Produce a read-only snapshot for percentile queries.
    pub fn snapshot(&self) -> SampleSnapshot {
        self.sample.lock().snapshot()
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new(UniformSample::default())
    }
}

impl std::fmt::Debug for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Histogram")
            .field("count", &self.count())
            .finish()
    }
}

/// Duration distribution (recorded in nanoseconds) plus a rate meter.
#[derive(Debug, Default)]
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values reach the sample in nanoseconds; pair with
    /// `HdrSample::for_durations()` rather than a microsecond-sized range.
    pub fn with_sample(sample: impl Sample + 'static) -> Self {
        Self {
            histogram: Histogram::new(sample),
            meter: Meter::new(),
        }
    }

    pub fn update(&self, elapsed: Duration) {
        let nanos = i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX);
        self.histogram.update(nanos);
        self.meter.mark(1);
    }

    pub fn update_since(&self, start: Instant) {
        self.update(start.elapsed());
    }

    /// Run `f`, record how long it took, and hand back its result.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.update_since(start);
        out
    }

    pub fn count(&self) -> u64 {
        self.histogram.count()
    }

    pub fn rate1(&self) -> f64 {
        self.meter.rate1()
    }

    /// Duration distribution in nanoseconds.
    pub fn snapshot(&self) -> SampleSnapshot {
        self.histogram.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::sample::HdrSample;

    #[test]
    fn empty_histogram_has_zero_count() {
        let h = Histogram::default();
        assert_eq!(h.count(), 0);
        assert_eq!(h.snapshot().count(), 0);
    }

    #[test]
    fn histogram_over_hdr_sample() {
        let h = Histogram::new(HdrSample::new());
        h.update(2016);
        let snap = h.snapshot();
        assert_eq!(snap.count(), 1);
        assert_eq!(snap.percentiles(&[0.5, 0.99]), vec![2016.0, 2016.0]);
    }

    #[test]
    fn timer_records_nanoseconds_and_marks() {
        let t = Timer::new();
        t.update(Duration::from_millis(200));
        let value = t.time(|| 42);

        assert_eq!(value, 42);
        assert_eq!(t.count(), 2);
        assert_eq!(t.snapshot().max(), 200_000_000);
    }
}
