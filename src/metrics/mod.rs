//! In-process metric kinds and the registry the publisher reads from.
//!
//! Handlers update metrics through shared `Arc` handles; the publisher
//! only ever reads them through [`Registry::each`].

pub mod counter;
pub mod histogram;
pub mod meter;
pub mod percentiles;
pub mod registry;
pub mod sample;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use counter::{Counter, Gauge, GaugeF64};
pub use histogram::{Histogram, Timer};
pub use meter::{Ewma, Meter};
pub use registry::{MetricsRegistry, Registry};
pub use sample::{HdrSample, Sample, SampleSnapshot, UniformSample};

/// One registry entry. Cloning clones the handle, not the metric.
#[derive(Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    GaugeF64(Arc<GaugeF64>),
    Meter(Arc<Meter>),
    Histogram(Arc<Histogram>),
    Timer(Arc<Timer>),
    /// A value the publisher has no translation for.
    Opaque(OpaqueMetric),
}

impl Metric {
    /// Wrap an arbitrary value; it will be reported and skipped on publish.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Metric::Opaque(OpaqueMetric {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Metric::Counter(_) => "counter",
            Metric::Gauge(_) => "gauge",
            Metric::GaugeF64(_) => "gauge_f64",
            Metric::Meter(_) => "meter",
            Metric::Histogram(_) => "histogram",
            Metric::Timer(_) => "timer",
            Metric::Opaque(_) => "opaque",
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Counter(c) => f.debug_tuple("Counter").field(&c.count()).finish(),
            Metric::Gauge(g) => f.debug_tuple("Gauge").field(&g.value()).finish(),
            Metric::GaugeF64(g) => f.debug_tuple("GaugeF64").field(&g.value()).finish(),
            Metric::Meter(m) => f.debug_tuple("Meter").field(&m.count()).finish(),
            Metric::Histogram(h) => f.debug_tuple("Histogram").field(&h.count()).finish(),
            Metric::Timer(t) => f.debug_tuple("Timer").field(&t.count()).finish(),
            Metric::Opaque(o) => f.debug_tuple("Opaque").field(&o.type_name).finish(),
        }
    }
}

/// Type-erased registry value with its Rust type name kept for reporting.
#[derive(Clone)]
pub struct OpaqueMetric {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl OpaqueMetric {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

macro_rules! impl_into_metric {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<Arc<$kind>> for Metric {
                fn from(metric: Arc<$kind>) -> Self {
                    Metric::$kind(metric)
                }
            }

            impl From<$kind> for Metric {
                fn from(metric: $kind) -> Self {
                    Metric::$kind(Arc::new(metric))
                }
            }
        )*
    };
}

impl_into_metric!(Counter, Gauge, GaugeF64, Meter, Histogram, Timer);
