use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};

use common::source::SampleSource;
use common::{DoubleBufferedQueue, PipelineDiagnostics, Sample};

/// Spawn the sample producer as a Tokio task. Same contract as the
/// threaded producer, with the period sleep handed to the runtime. The
/// task exits once `shutdown` is set and returns the source to the
/// awaiting caller.
pub fn spawn_producer<S, const C: usize>(
    period: Duration,
    mut source: S,
    queue: Arc<DoubleBufferedQueue<Sample<C>>>,
    diagnostics: Arc<PipelineDiagnostics>,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<S>
where
    S: SampleSource<C> + 'static,
{
    tokio::spawn(async move {
        let start_time = Instant::now();
        let mut next_tick = start_time;

        while !shutdown.load(Ordering::Relaxed) {
            let elapsed = start_time.elapsed().as_secs_f64();
            match source.read() {
                Ok(channels) => {
                    if !queue.put(Sample::new(elapsed, channels)) {
                        diagnostics.record_dropped_sample();
                        log::trace!("handoff queue full, dropped sample at t={elapsed:.3}");
                    }
                }
                Err(err) => {
                    diagnostics.record_source_fault();
                    log::warn!("sample source fault at t={elapsed:.3}: {err}");
                }
            }

            next_tick += period;
            let now = Instant::now();
            if next_tick <= now {
                next_tick = now + period;
            }
            sleep_until(next_tick).await;
        }
        source
    })
}
