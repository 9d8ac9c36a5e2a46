pub mod producer;

pub use producer::SampleProducer;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::source::RandomWalk;
use common::{
    ChartPipeline, CsvRecorder, DoubleBufferedQueue, PipelineConfig, PipelineDiagnostics,
    PipelineReport,
};

/// Run the demo pipeline on OS threads: a random-walk producer plus a
/// consumer loop driving the chart tick at its own cadence, for
/// `config.duration_secs`.
pub fn run_pipeline(config: &PipelineConfig) -> PipelineReport {
    let queue = Arc::new(DoubleBufferedQueue::new(config.handoff_capacity));
    let diagnostics = Arc::new(PipelineDiagnostics::default());
    let mut pipeline: ChartPipeline<2> =
        ChartPipeline::new(config, Arc::clone(&queue), Arc::clone(&diagnostics));

    let mut recorder = open_recorder(config);

    let source = RandomWalk::new(config.producer_period_ms);
    let mut producer = SampleProducer::new(
        config.producer_period(),
        source,
        Arc::clone(&queue),
        Arc::clone(&diagnostics),
    );
    producer.start();

    let mut report = PipelineReport::default();
    let period = config.chart_period();
    let deadline = Instant::now() + Duration::from_secs(config.duration_secs);
    let mut next_tick = Instant::now() + period;

    while Instant::now() < deadline {
        let now = Instant::now();
        if now < next_tick {
            thread::sleep(next_tick - now);
        }
        next_tick += period;

        if let Some(frame) = pipeline.tick() {
            if let Some(recorder) = recorder.as_mut() {
                recorder.record_tail(pipeline.history(), frame.appended);
            }
            report.record_frame(frame);
        }
    }

    producer.stop();

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
