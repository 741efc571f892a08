use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Monotonic-ish integer total. `dec` exists for gauges-in-disguise.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicI64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self, n: i64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn dec(&self, n: i64) {
        self.count.fetch_sub(n, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Instantaneous integer value.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Instantaneous floating-point value, stored as raw bits.
#[derive(Debug, Default)]
pub struct GaugeF64 {
    bits: AtomicU64,
}

impl GaugeF64 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_inc_dec_clear() {
        let c = Counter::new();
        c.inc(5);
        c.dec(2);
        assert_eq!(c.count(), 3);
        c.clear();
        assert_eq!(c.count(), 0);
    }

    #[test]
    fn gauges_hold_last_value() {
        let g = Gauge::new();
        g.update(7);
        g.update(-3);
        assert_eq!(g.value(), -3);

        let f = GaugeF64::new();
        assert_eq!(f.value(), 0.0);
        f.update(47.11);
        assert_eq!(f.value(), 47.11);
    }
}
