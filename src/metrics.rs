//! Metrics sink trait (§6). A pure internal seam: this crate has no
//! opinion on whether counters end up in Prometheus, StatsD, or nowhere.

use std::sync::Mutex;
use std::time::Duration;

/// Observer for classifier runtime metrics. All methods take `&self` since
/// implementations are expected to hold their own interior mutability.
pub trait MetricsSink: Send + Sync {
    fn record_cache_hit(&self) {}
    fn record_cache_miss(&self) {}
    fn record_classification(&self, duration: Duration, used_fallback: bool) {
        let _ = (duration, used_fallback);
    }
    fn record_retry(&self, attempt: u32) {
        let _ = attempt;
    }
    fn record_coalesced(&self) {}
}

/// Discards everything. The default when no sink is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {}

/// In-memory sink used by tests to assert on what was recorded.
#[derive(Default)]
pub struct RecordingMetricsSink {
    inner: Mutex<RecordedCounters>,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct RecordedCounters {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub classifications: u64,
    pub fallbacks: u64,
    pub retries: u64,
    pub coalesced: u64,
}

impl RecordingMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RecordedCounters {
        *self.inner.lock().unwrap()
    }
}

impl MetricsSink for RecordingMetricsSink {
    fn record_cache_hit(&self) {
        self.inner.lock().unwrap().cache_hits += 1;
    }

    fn record_cache_miss(&self) {
        self.inner.lock().unwrap().cache_misses += 1;
    }

    fn record_classification(&self, _duration: Duration, used_fallback: bool) {
        let mut counters = self.inner.lock().unwrap();
        counters.classifications += 1;
        if used_fallback {
            counters.fallbacks += 1;
        }
    }

    fn record_retry(&self, _attempt: u32) {
        self.inner.lock().unwrap().retries += 1;
    }

    fn record_coalesced(&self) {
        self.inner.lock().unwrap().coalesced += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_tallies_events() {
        let sink = RecordingMetricsSink::new();
        sink.record_cache_hit();
        sink.record_cache_miss();
        sink.record_classification(Duration::from_millis(5), true);
        sink.record_retry(1);
        sink.record_coalesced();

        let snapshot = sink.snapshot();
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.classifications, 1);
        assert_eq!(snapshot.fallbacks, 1);
        assert_eq!(snapshot.retries, 1);
        assert_eq!(snapshot.coalesced, 1);
    }
}
