use std::sync::Arc;

use crate::metrics::{Metric, Registry, SampleSnapshot};

use super::config::PublisherConfig;
use super::datum::{MetricDatum, StandardUnit};

/// Read every metric in `registry` into data points.
///
/// Scalars become one datum each. Histograms and timers expand into
/// `<name>.count` plus one `<name>.p<N>` per configured quantile, and are
/// skipped entirely while empty. Opaque entries are reported and skipped.
pub fn read_metrics<R: Registry + ?Sized>(
    registry: &R,
    config: &PublisherConfig,
) -> Vec<MetricDatum> {
    config.debug("reading metrics");

    let dimensions = config.shared_dimensions();
    let mut data = Vec::new();

    let build = |name: &str, value: f64, unit: Option<StandardUnit>| {
        config.debug(&format!("building metric, {name}"));
        MetricDatum::new(name, value, unit, Arc::clone(&dimensions))
    };

    registry.each(&mut |name, metric| match metric {
        Metric::Counter(c) => {
            data.push(build(name, c.count() as f64, Some(StandardUnit::Count)));
        }
        Metric::Gauge(g) => {
            data.push(build(name, g.value() as f64, Some(StandardUnit::Count)));
        }
        Metric::GaugeF64(g) => {
            data.push(build(name, g.value(), Some(StandardUnit::Count)));
        }
        Metric::Meter(m) => {
            data.push(build(name, m.rate1(), Some(StandardUnit::Count)));
        }
        Metric::Histogram(h) => {
            expand_distribution(&mut data, name, &h.snapshot(), config.percentiles(), &build);
        }
        Metric::Timer(t) => {
            expand_distribution(&mut data, name, &t.snapshot(), config.percentiles(), &build);
        }
        Metric::Opaque(o) => {
            config.error(&format!(
                "received unexpected metric, {name}: {}",
                o.type_name()
            ));
        }
    });

    config.debug(&format!("received {} event(s)", data.len()));
    data
}

fn expand_distribution(
    data: &mut Vec<MetricDatum>,
    name: &str,
    snapshot: &SampleSnapshot,
    percentiles: &[f64],
    build: &impl Fn(&str, f64, Option<StandardUnit>) -> MetricDatum,
) {
    if snapshot.count() == 0 {
        return;
    }

    data.push(build(
        &format!("{name}.count"),
        snapshot.count() as f64,
        Some(StandardUnit::Count),
    ));

    for (q, value) in percentiles.iter().zip(snapshot.percentiles(percentiles)) {
        data.push(build(&format!("{name}.{}", percentile_suffix(*q)), value, None));
    }
}

/// `0.5 → "p50"`, `0.44 → "p44"`, `0.999 → "p100"`.
pub fn percentile_suffix(quantile: f64) -> String {
    format!("p{}", (quantile * 100.0).round() as u32)
}
