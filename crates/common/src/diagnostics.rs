use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters for conditions the pipeline survives by design: dropped
/// samples under backpressure, transient source faults, history eviction
/// and oversized-batch truncation. Silent to the data consumer, observable
/// for diagnosis.
#[derive(Debug, Default)]
pub struct PipelineDiagnostics {
    dropped_samples: AtomicU64,
    source_faults: AtomicU64,
    evicted_samples: AtomicU64,
    truncated_samples: AtomicU64,
}

impl PipelineDiagnostics {
    pub fn record_dropped_sample(&self) {
        self.dropped_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_fault(&self) {
        self.source_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evicted(&self, count: u64) {
        self.evicted_samples.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_truncated(&self, count: u64) {
        self.truncated_samples.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            dropped_samples: self.dropped_samples.load(Ordering::Relaxed),
            source_faults: self.source_faults.load(Ordering::Relaxed),
            evicted_samples: self.evicted_samples.load(Ordering::Relaxed),
            truncated_samples: self.truncated_samples.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub dropped_samples: u64,
    pub source_faults: u64,
    pub evicted_samples: u64,
    pub truncated_samples: u64,
}
