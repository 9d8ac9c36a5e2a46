use std::sync::Arc;

use common::source::{SampleSource, SourceError};
use common::{ChartPipeline, DoubleBufferedQueue, PipelineConfig, PipelineDiagnostics, Sample};
use threaded_impl::SampleProducer;

struct RampSource {
    next: u64,
}

impl SampleSource<2> for RampSource {
    fn read(&mut self) -> Result<[f64; 2], SourceError> {
        let value = self.next as f64;
        self.next += 1;
        Ok([value, -value])
    }
}

fn small_config() -> PipelineConfig {
    PipelineConfig {
        handoff_capacity: 4,
        history_capacity: 10,
        initial_visible_secs: 60.0,
        ..PipelineConfig::default()
    }
}

#[test]
fn drains_and_appends_across_ticks() {
    let config = small_config();
    let queue = Arc::new(DoubleBufferedQueue::new(config.handoff_capacity));
    let diagnostics = Arc::new(PipelineDiagnostics::default());
    let mut pipeline: ChartPipeline<2> =
        ChartPipeline::new(&config, Arc::clone(&queue), Arc::clone(&diagnostics));

    // Producer fills the queue to capacity; the fifth put is backpressure.
    for t in 0..4 {
        assert!(queue.put(Sample::new(t as f64, [0.0, 0.0])));
    }
    assert!(!queue.put(Sample::new(4.0, [0.0, 0.0])));

    let first = pipeline.tick().expect("first drain yields 4 samples");
    assert_eq!(first.appended, 4);

    for t in 4..7 {
        assert!(queue.put(Sample::new(t as f64, [0.0, 0.0])));
    }
    let second = pipeline.tick().expect("second drain yields 3 samples");
    assert_eq!(second.appended, 3);

    assert_eq!(pipeline.history().len(), 7);
    assert_eq!(
        pipeline.history().timestamps(),
        &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    );
}

#[test]
fn eviction_end_to_end() {
    let config = small_config();
    let queue = Arc::new(DoubleBufferedQueue::new(16));
    let diagnostics = Arc::new(PipelineDiagnostics::default());
    let mut pipeline: ChartPipeline<2> =
        ChartPipeline::new(&config, Arc::clone(&queue), Arc::clone(&diagnostics));

    for t in 0..9 {
        queue.put(Sample::new(t as f64, [0.0, 0.0]));
    }
    pipeline.tick().unwrap();
    assert_eq!(pipeline.history().len(), 9);

    for t in 9..13 {
        queue.put(Sample::new(t as f64, [0.0, 0.0]));
    }
    pipeline.tick().unwrap();

    let history = pipeline.history();
    assert!(history.len() <= 10);
    assert!(history.timestamps().ends_with(&[9.0, 10.0, 11.0, 12.0]));
    let oldest_retained = history.timestamps()[0];
    assert!(oldest_retained > 3.0);
    assert!(diagnostics.snapshot().evicted_samples > 0);
}

#[test]
fn live_producer_feeds_the_chart() {
    let config = PipelineConfig {
        handoff_capacity: 1024,
        history_capacity: 1024,
        producer_period_ms: 2,
        ..PipelineConfig::default()
    };
    let queue = Arc::new(DoubleBufferedQueue::new(config.handoff_capacity));
    let diagnostics = Arc::new(PipelineDiagnostics::default());
    let mut pipeline: ChartPipeline<2> =
        ChartPipeline::new(&config, Arc::clone(&queue), Arc::clone(&diagnostics));

    let mut producer = SampleProducer::new(
        config.producer_period(),
        RampSource { next: 0 },
        Arc::clone(&queue),
        Arc::clone(&diagnostics),
    );
    producer.start();

    let mut frames = 0;
    for _ in 0..10 {
        std::thread::sleep(std::time::Duration::from_millis(10));
        if pipeline.tick().is_some() {
            frames += 1;
        }
    }
    producer.stop();
    pipeline.tick();

    assert!(frames > 0);
    let history = pipeline.history();
    assert!(!history.is_empty());
    let timestamps = history.timestamps();
    assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
    // Channel values arrived with their sample, in production order.
    let series = history.series(0);
    assert!(series.windows(2).all(|pair| pair[1] > pair[0]));
    assert_eq!(diagnostics.snapshot().dropped_samples, 0);
}

#[test]
fn run_pipeline_smoke() {
    let config = PipelineConfig {
        duration_secs: 1,
        producer_period_ms: 5,
        chart_period_ms: 20,
        handoff_capacity: 1024,
        history_capacity: 1024,
        ..PipelineConfig::default()
    };

    let report = threaded_impl::run_pipeline(&config);

    assert!(report.frames > 0);
    assert!(report.samples_appended > 0);
    assert_eq!(report.history_len as u64, report.samples_appended);
    assert!(report.span.is_some());
    assert_eq!(report.diagnostics.truncated_samples, 0);
}
