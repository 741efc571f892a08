use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::Metric;
use crate::error::RegistryError;

/// Anything the publisher can enumerate metrics from.
pub trait Registry: Send + Sync {
    /// Visit every registered metric with its name.
    fn each(&self, f: &mut dyn FnMut(&str, &Metric));
}

/// Thread-safe name → metric map. Iterates in name order.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    metrics: RwLock<BTreeMap<String, Metric>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `metric` under `name`; a name can only be taken once.
    pub fn register(
        &self,
        name: impl Into<String>,
        metric: impl Into<Metric>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut metrics = self.metrics.write();
        if metrics.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        metrics.insert(name, metric.into());
        Ok(())
    }

    /// Existing metric under `name`, or register the one `make` builds.
    pub fn get_or_register<M: Into<Metric>>(
        &self,
        name: impl Into<String>,
        make: impl FnOnce() -> M,
    ) -> Metric {
        self.metrics
            .write()
            .entry(name.into())
            .or_insert_with(|| make().into())
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Metric> {
        self.metrics.read().get(name).cloned()
    }

    pub fn unregister(&self, name: &str) -> Option<Metric> {
        self.metrics.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.metrics.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.read().is_empty()
    }
}

impl Registry for MetricsRegistry {
    fn each(&self, f: &mut dyn FnMut(&str, &Metric)) {
        // Copy out first so callbacks never run under the lock
        let entries: Vec<(String, Metric)> = self
            .metrics
            .read()
            .iter()
            .map(|(name, metric)| (name.clone(), metric.clone()))
            .collect();

        for (name, metric) in &entries {
            f(name, metric);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metrics::{Counter, Gauge};

    #[test]
    fn duplicate_names_are_rejected() {
        let registry = MetricsRegistry::new();
        registry.register("hits", Counter::new()).unwrap();

        let err = registry.register("hits", Gauge::new()).unwrap_err();
        assert_eq!(err.to_string(), "duplicate metric: hits");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_or_register_returns_existing() {
        let registry = MetricsRegistry::new();
        let counter = Arc::new(Counter::new());
        registry.register("hits", counter.clone()).unwrap();
        counter.inc(3);

        match registry.get_or_register("hits", Counter::new) {
            Metric::Counter(c) => assert_eq!(c.count(), 3),
            other => panic!("unexpected metric kind {}", other.kind()),
        }
    }

    #[test]
    fn each_visits_in_name_order() {
        let registry = MetricsRegistry::new();
        for name in ["b", "c", "a"] {
            registry.register(name, Counter::new()).unwrap();
        }

        let mut seen = Vec::new();
        registry.each(&mut |name, _| seen.push(name.to_string()));
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn unregister_removes() {
        let registry = MetricsRegistry::new();
        registry.register("hits", Counter::new()).unwrap();
        assert!(registry.unregister("hits").is_some());
        assert!(registry.is_empty());
        assert!(registry.get("hits").is_none());
    }
}
