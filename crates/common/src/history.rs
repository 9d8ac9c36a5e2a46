use crate::Sample;

/// What one `append` call did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Samples actually added (batch length minus any truncation).
    pub appended: usize,
    /// Oldest entries discarded to make room.
    pub evicted: usize,
    /// Leading samples of an oversized batch that never made it in.
    pub truncated: usize,
}

/// Bounded, time-ordered sample history backing the chart.
///
/// Stored as parallel sequences (one timestamp column plus one column per
/// channel) so the rendering side can take contiguous slices per series.
/// Only the consumer thread touches this; no locking.
pub struct HistoryStore<const C: usize> {
    timestamps: Vec<f64>,
    series: [Vec<f64>; C],
    capacity: usize,
    headroom_percent: usize,
}

impl<const C: usize> HistoryStore<C> {
    pub fn new(capacity: usize, headroom_percent: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            series: std::array::from_fn(|_| Vec::with_capacity(capacity)),
            capacity,
            headroom_percent,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Value column for one channel, parallel to `timestamps`.
    pub fn series(&self, channel: usize) -> &[f64] {
        &self.series[channel]
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.timestamps.last().copied()
    }

    /// Append a time-ordered batch, evicting the oldest entries when the
    /// store would overflow.
    ///
    /// A batch larger than the whole store keeps only its newest
    /// `capacity` samples; the overflow count is reported back so the
    /// caller can surface the loss. Timestamps must not run backwards
    /// relative to what is already stored.
    pub fn append(&mut self, samples: &[Sample<C>]) -> AppendOutcome {
        let mut outcome = AppendOutcome::default();

        let mut batch = samples;
        if batch.len() > self.capacity {
            outcome.truncated = batch.len() - self.capacity;
            batch = &batch[batch.len() - self.capacity..];
        }

        if self.timestamps.len() + batch.len() >= self.capacity {
            outcome.evicted = self.evict_for(batch.len());
        }

        for sample in batch {
            self.timestamps.push(sample.elapsed);
            for (column, value) in self.series.iter_mut().zip(sample.channels) {
                column.push(value);
            }
        }
        outcome.appended = batch.len();
        outcome
    }

    /// Discard the oldest entries so `incoming` samples fit with the
    /// configured headroom left free afterwards. Shifting every retained
    /// element is O(len), so the headroom batches many appends into one
    /// eviction pass. Returns the number of entries discarded.
    fn evict_for(&mut self, incoming: usize) -> usize {
        let limit = self.capacity * (100 - self.headroom_percent) / 100;
        let keep = limit.saturating_sub(incoming).min(self.timestamps.len());
        let evicted = self.timestamps.len() - keep;
        if evicted == 0 {
            return 0;
        }

        self.timestamps.copy_within(evicted.., 0);
        self.timestamps.truncate(keep);
        for column in self.series.iter_mut() {
            column.copy_within(evicted.., 0);
            column.truncate(keep);
        }
        evicted
    }

    /// Inclusive index range of entries relevant to the visible interval,
    /// extended one entry past either boundary where possible so edge
    /// segments can be interpolated.
    pub fn visible_range(&self, visible_start: f64, visible_end: f64) -> Option<(usize, usize)> {
        if self.timestamps.is_empty() {
            return None;
        }
        let start = self
            .timestamps
            .partition_point(|&t| t <= visible_start)
            .saturating_sub(1);
        let end = self
            .timestamps
            .partition_point(|&t| t < visible_end)
            .min(self.timestamps.len() - 1);
        Some((start, end))
    }

    /// Full stored time span for axis ranging, with the end padded out to
    /// `min_visible` seconds so a near-empty store never produces a
    /// degenerate axis.
    pub fn time_span(&self, min_visible: f64) -> Option<(f64, f64)> {
        let first = *self.timestamps.first()?;
        let last = *self.timestamps.last()?;
        if last - first < min_visible {
            Some((first, first + min_visible))
        } else {
            Some((first, last))
        }
    }
}
