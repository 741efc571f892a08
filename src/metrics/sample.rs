use hdrhistogram::Histogram;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::percentiles::{hdr_percentiles, sorted_percentiles};

// ─── Configuration ───────────────────────────────────────────────

/// Reservoir size used by histograms and timers unless told otherwise.
pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;

/// HdrHistogram range: 1 μs → 60 s, 3 significant figures
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 60_000_000;
const HIST_SIGFIG: u8 = 3;

/// Initial range for nanosecond durations: 1 ns → 60 s
const DURATION_HIGH_NS: u64 = 60_000_000_000;

// ─── Public types ────────────────────────────────────────────────

/// Storage strategy behind a `Histogram` or `Timer`.
pub trait Sample: Send {
    /// Record one observation.
    fn update(&mut self, value: i64);

    /// Drop every observation and reset the count.
    fn clear(&mut self);

    /// Number of observations ever recorded (not just the retained ones).
    fn count(&self) -> u64;

    /// Freeze the current state for percentile queries.
    fn snapshot(&self) -> SampleSnapshot;
}

/// Read-only copy of a sample, detached from the live metric.
#[derive(Debug, Clone)]
pub struct SampleSnapshot {
    count: u64,
    values: SnapshotValues,
}

#[derive(Debug, Clone)]
enum SnapshotValues {
    /// Ascending-sorted reservoir contents
    Sorted(Vec<i64>),
    Hdr(Histogram<u64>),
}

impl SampleSnapshot {
    pub fn count(&self) -> u64 {
        self.count
    }

    /// One value per quantile (each in `[0, 1]`), aligned with the input.
    pub fn percentiles(&self, quantiles: &[f64]) -> Vec<f64> {
        match &self.values {
            SnapshotValues::Sorted(values) => sorted_percentiles(values, quantiles),
            SnapshotValues::Hdr(hist) => hdr_percentiles(hist, quantiles),
        }
    }

    pub fn min(&self) -> i64 {
        match &self.values {
            SnapshotValues::Sorted(values) => values.first().copied().unwrap_or(0),
            SnapshotValues::Hdr(hist) if hist.len() > 0 => hist.min() as i64,
            SnapshotValues::Hdr(_) => 0,
        }
    }

    pub fn max(&self) -> i64 {
        match &self.values {
            SnapshotValues::Sorted(values) => values.last().copied().unwrap_or(0),
            SnapshotValues::Hdr(hist) if hist.len() > 0 => hist.max() as i64,
            SnapshotValues::Hdr(_) => 0,
        }
    }

    pub fn mean(&self) -> f64 {
        match &self.values {
            SnapshotValues::Sorted(values) if !values.is_empty() => {
                values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
            }
            SnapshotValues::Sorted(_) => 0.0,
            SnapshotValues::Hdr(hist) if hist.len() > 0 => hist.mean(),
            SnapshotValues::Hdr(_) => 0.0,
        }
    }
}

// ─── UniformSample ───────────────────────────────────────────────

/// Fixed-size reservoir filled with Vitter's algorithm R.
/// Every observation has the same chance of being retained.
#[derive(Debug)]
pub struct UniformSample {
    reservoir_size: usize,
    count: u64,
    values: Vec<i64>,
    rng: StdRng,
}

impl UniformSample {
    pub fn new(reservoir_size: usize) -> Self {
        let reservoir_size = reservoir_size.max(1);
        Self {
            reservoir_size,
            count: 0,
            values: Vec::with_capacity(reservoir_size.min(DEFAULT_RESERVOIR_SIZE)),
            rng: StdRng::from_entropy(),
        }
    }

    /// Number of values currently retained.
    pub fn size(&self) -> usize {
        self.values.len()
    }
}

impl Default for UniformSample {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVOIR_SIZE)
    }
}

impl Sample for UniformSample {
    fn update(&mut self, value: i64) {
        self.count += 1;
        if self.values.len() < self.reservoir_size {
            self.values.push(value);
            return;
        }
        let slot = self.rng.gen_range(0..self.count);
        if (slot as usize) < self.reservoir_size {
            self.values[slot as usize] = value;
        }
    }

    fn clear(&mut self) {
        self.count = 0;
        self.values.clear();
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn snapshot(&self) -> SampleSnapshot {
        let mut sorted = self.values.clone();
        sorted.sort_unstable();
        SampleSnapshot {
            count: self.count,
            values: SnapshotValues::Sorted(sorted),
        }
    }
}

// ─── HdrSample ───────────────────────────────────────────────────

/// HdrHistogram-backed sample: bounded precision, keeps every observation.
/// Negative values record as 0. The `new` and `for_durations` histograms
/// grow past their initial upper bound; `with_bounds` ones saturate there.
#[derive(Debug)]
pub struct HdrSample {
    hist: Histogram<u64>,
}

impl HdrSample {
    pub fn new() -> Self {
        Self::auto_resizing(HIST_HIGH)
    }

    /// Sized for `Timer`, which records nanoseconds.
    pub fn for_durations() -> Self {
        Self::auto_resizing(DURATION_HIGH_NS)
    }

    fn auto_resizing(high: u64) -> Self {
        let mut hist = Histogram::<u64>::new_with_bounds(HIST_LOW, high, HIST_SIGFIG)
            .expect("histogram creation");
        hist.auto(true);
        Self { hist }
    }

    /// Fixed range; fails if the bounds or significant figures are invalid.
    pub fn with_bounds(
        low: u64,
        high: u64,
        sigfig: u8,
    ) -> Result<Self, hdrhistogram::CreationError> {
        Ok(Self {
            hist: Histogram::<u64>::new_with_bounds(low, high, sigfig)?,
        })
    }
}

impl Default for HdrSample {
    fn default() -> Self {
        Self::new()
    }
}

impl Sample for HdrSample {
    fn update(&mut self, value: i64) {
        let value = value.max(0) as u64;
        if self.hist.record(value).is_err() {
            self.hist.saturating_record(value);
        }
    }

    fn clear(&mut self) {
        self.hist.reset();
    }

    fn count(&self) -> u64 {
        self.hist.len()
    }

    fn snapshot(&self) -> SampleSnapshot {
        SampleSnapshot {
            count: self.hist.len(),
            values: SnapshotValues::Hdr(self.hist.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_reservoir_never_exceeds_its_size() {
        let mut sample = UniformSample::new(100);
        for v in 0..10_000 {
            sample.update(v);
        }
        assert_eq!(sample.size(), 100);
        assert_eq!(sample.count(), 10_000);

        let snap = sample.snapshot();
        assert_eq!(snap.count(), 10_000);
        assert!(snap.min() >= 0 && snap.max() < 10_000);
    }

    #[test]
    fn uniform_snapshot_is_sorted_and_detached() {
        let mut sample = UniformSample::default();
        for v in [5, 1, 3] {
            sample.update(v);
        }
        let snap = sample.snapshot();
        sample.update(100);

        assert_eq!(snap.min(), 1);
        assert_eq!(snap.max(), 5);
        assert_eq!(snap.mean(), 3.0);
        assert_eq!(snap.count(), 3);
    }

    #[test]
    fn clear_resets_count() {
        let mut sample = UniformSample::default();
        sample.update(1);
        sample.clear();
        assert_eq!(sample.count(), 0);
        assert_eq!(sample.snapshot().percentiles(&[0.5]), vec![0.0]);
    }

    #[test]
    fn hdr_sample_clamps_negative_values() {
        let mut sample = HdrSample::new();
        sample.update(-7);
        sample.update(2016);
        let snap = sample.snapshot();
        assert_eq!(snap.count(), 2);
        assert_eq!(snap.min(), 0);
        assert_eq!(snap.percentiles(&[1.0]), vec![2016.0]);
    }

    #[test]
    fn hdr_sample_grows_past_initial_bound() {
        let mut sample = HdrSample::new();
        sample.update(200_000_000);
        let p50 = sample.snapshot().percentiles(&[0.5])[0];
        assert!((p50 - 200_000_000.0).abs() / 200_000_000.0 < 1e-3, "p50 was {p50}");
    }

    #[test]
    fn hdr_with_bounds_saturates_at_upper_bound() {
        let mut sample = HdrSample::with_bounds(1, 1_000, 3).unwrap();
        sample.update(5_000);
        let snap = sample.snapshot();
        assert_eq!(snap.count(), 1);
        assert!(snap.max() <= 1_000 + 1);
    }

    #[test]
    fn hdr_with_bounds_rejects_bad_range() {
        assert!(HdrSample::with_bounds(10, 5, 3).is_err());
    }
}
