pub mod producer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::{sleep_until, Duration, Instant};

use common::source::RandomWalk;
use common::{
    ChartPipeline, CsvRecorder, DoubleBufferedQueue, PipelineConfig, PipelineDiagnostics,
    PipelineReport,
};

/// Tokio rendition of the demo pipeline: the producer runs as a task, the
/// consumer awaits the chart deadline between ticks. Semantics match the
/// threaded implementation.
pub async fn run_pipeline(config: &PipelineConfig) -> PipelineReport {
    let queue = Arc::new(DoubleBufferedQueue::new(config.handoff_capacity));
    let diagnostics = Arc::new(PipelineDiagnostics::default());
    let mut pipeline: ChartPipeline<2> =
        ChartPipeline::new(config, Arc::clone(&queue), Arc::clone(&diagnostics));

    let mut recorder = open_recorder(config);

    let shutdown = Arc::new(AtomicBool::new(false));
    let producer = producer::spawn_producer(
        config.producer_period(),
        RandomWalk::new(config.producer_period_ms),
        Arc::clone(&queue),
        Arc::clone(&diagnostics),
        Arc::clone(&shutdown),
    );

    let mut report = PipelineReport::default();
    let period = config.chart_period();
    let deadline = Instant::now() + Duration::from_secs(config.duration_secs);
    let mut next_tick = Instant::now() + period;

    while Instant::now() < deadline {
        sleep_until(next_tick).await;
        next_tick += period;

        if let Some(frame) = pipeline.tick() {
            if let Some(recorder) = recorder.as_mut() {
                recorder.record_tail(pipeline.history(), frame.appended);
            }
            report.record_frame(frame);
        }
    }

    shutdown.store(true, Ordering::Relaxed);
    if producer.await.is_err() {
        log::error!("sample producer task panicked");
    }

    // Pick up whatever was produced after the last scheduled tick.
    if let Some(frame) = pipeline.tick() {
        if let Some(recorder) = recorder.as_mut() {
            recorder.record_tail(pipeline.history(), frame.appended);
        }
        report.record_frame(frame);
    }
    if let Some(recorder) = recorder.as_mut() {
        recorder.finish();
    }

    report.finalize(&pipeline, &diagnostics, config.initial_visible_secs);
    report
}

fn open_recorder(config: &PipelineConfig) -> Option<CsvRecorder> {
    let path = config.output_csv.as_deref()?;
    match CsvRecorder::create(path, 2) {
        Ok(recorder) => Some(recorder),
        Err(err) => {
            log::error!("could not open csv output {path}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn async_run_produces_frames() {
        let config = PipelineConfig {
            duration_secs: 1,
            producer_period_ms: 5,
            chart_period_ms: 20,
            handoff_capacity: 1024,
            history_capacity: 1024,
            ..PipelineConfig::default()
        };

        let report = run_pipeline(&config).await;

        assert!(report.frames > 0);
        assert!(report.samples_appended > 0);
        assert_eq!(report.diagnostics.dropped_samples, 0);
        assert!(report.span.is_some());
    }

    #[tokio::test]
    async fn producer_task_stops_on_shutdown() {
        let queue = Arc::new(DoubleBufferedQueue::new(256));
        let diagnostics = Arc::new(PipelineDiagnostics::default());
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = producer::spawn_producer(
            Duration::from_millis(2),
            RandomWalk::new(2),
            Arc::clone(&queue),
            Arc::clone(&diagnostics),
            Arc::clone(&shutdown),
        );

        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown.store(true, Ordering::Relaxed);
        handle.await.expect("producer task exits cleanly");

        let mut out = Vec::new();
        queue.drain(&mut out);
        assert!(!out.is_empty());

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.drain(&mut out);
        assert!(out.is_empty());
    }
}
