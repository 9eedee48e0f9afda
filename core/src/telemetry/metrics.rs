use std::collections::BTreeMap;
use std::sync::Mutex;

/// Point-in-time copy of the recorded counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub errors: usize,
    pub per_operation: BTreeMap<String, usize>,
}

/// Counts evaluated matrix operations, shareable across threads.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    /// Records one evaluation of `operation`; failures also bump `errors`.
    pub fn record(&self, operation: &str, succeeded: bool) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed += 1;
            if !succeeded {
                metrics.errors += 1;
            }
            *metrics
                .per_operation
                .entry(operation.to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| metrics.clone())
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
