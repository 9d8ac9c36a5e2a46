use std::sync::Arc;

use crate::diagnostics::DiagnosticsSnapshot;
use crate::{
    DoubleBufferedQueue, HistoryStore, PipelineConfig, PipelineDiagnostics, RenderFrame, Sample,
    Viewport,
};

/// Consumer half of the pipeline: owns the history, the viewport and the
/// drain scratch buffer. Driven from the outside through `tick`, typically
/// by a display timer; it never blocks waiting for data.
pub struct ChartPipeline<const C: usize> {
    queue: Arc<DoubleBufferedQueue<Sample<C>>>,
    history: HistoryStore<C>,
    viewport: Viewport,
    diagnostics: Arc<PipelineDiagnostics>,
    min_visible_secs: f64,
    scratch: Vec<Sample<C>>,
}

impl<const C: usize> ChartPipeline<C> {
    pub fn new(
        config: &PipelineConfig,
        queue: Arc<DoubleBufferedQueue<Sample<C>>>,
        diagnostics: Arc<PipelineDiagnostics>,
    ) -> Self {
        Self {
            queue,
            history: HistoryStore::new(config.history_capacity, config.headroom_percent),
            viewport: Viewport::new(0.0, config.initial_visible_secs),
            diagnostics,
            min_visible_secs: config.initial_visible_secs,
            scratch: Vec::with_capacity(config.handoff_capacity),
        }
    }

    pub fn history(&self) -> &HistoryStore<C> {
        &self.history
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// For the navigation collaborator (scroll bar, drag-to-pan).
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// One consumer tick: drain the queue, fold new samples into the
    /// history, advance the viewport if it was pinned to the leading edge,
    /// and report the window to render. Returns None when nothing arrived
    /// since the last tick.
    pub fn tick(&mut self) -> Option<RenderFrame> {
        // Capture follow state from the pre-append window position; the
        // leading edge moves once the new samples land.
        let follow = match self.history.last_timestamp() {
            Some(last) => self.viewport.is_tracking_latest(last),
            None => true,
        };

        self.queue.drain(&mut self.scratch);
        if self.scratch.is_empty() {
            return None;
        }

        let outcome = self.history.append(&self.scratch);
        if outcome.truncated > 0 {
            self.diagnostics.record_truncated(outcome.truncated as u64);
            log::warn!(
                "incoming batch exceeded history capacity, discarded {} oldest samples of the batch",
                outcome.truncated
            );
        }
        if outcome.evicted > 0 {
            self.diagnostics.record_evicted(outcome.evicted as u64);
            log::debug!("evicted {} oldest history entries", outcome.evicted);
        }

        if follow {
            if let Some(last) = self.history.last_timestamp() {
                self.viewport.follow(last);
            }
        }

        let span = self.history.time_span(self.min_visible_secs)?;
        let visible = self
            .history
            .visible_range(self.viewport.left, self.viewport.right())?;

        Some(RenderFrame {
            visible,
            span,
            auto_scroll: follow,
            appended: outcome.appended,
        })
    }
}

/// End-of-run summary assembled by the runner loops.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub frames: u64,
    pub samples_appended: u64,
    pub history_len: usize,
    pub span: Option<(f64, f64)>,
    pub last_frame: Option<RenderFrame>,
    pub diagnostics: DiagnosticsSnapshot,
}

impl PipelineReport {
    pub fn record_frame(&mut self, frame: RenderFrame) {
        self.frames += 1;
        self.samples_appended += frame.appended as u64;
        self.last_frame = Some(frame);
    }

    pub fn finalize<const C: usize>(
        &mut self,
        pipeline: &ChartPipeline<C>,
        diagnostics: &PipelineDiagnostics,
        min_visible_secs: f64,
    ) {
        self.history_len = pipeline.history().len();
        self.span = pipeline.history().time_span(min_visible_secs);
        self.diagnostics = diagnostics.snapshot();
    }
}
