use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use common::source::SampleSource;
use common::{DoubleBufferedQueue, PipelineDiagnostics, Sample};

/// Background sample producer: one OS thread reading the source once per
/// period and pushing into the handoff queue.
///
/// Lifecycle is Stopped -> Running -> Stopped. `stop` joins the thread, so
/// once it returns no further `put` can happen; the source is handed back
/// by the exiting thread so the producer can be started again.
pub struct SampleProducer<S, const C: usize> {
    period: Duration,
    source: Option<S>,
    queue: Arc<DoubleBufferedQueue<Sample<C>>>,
    diagnostics: Arc<PipelineDiagnostics>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<S>>,
}

impl<S, const C: usize> SampleProducer<S, C>
where
    S: SampleSource<C> + 'static,
{
    pub fn new(
        period: Duration,
        source: S,
        queue: Arc<DoubleBufferedQueue<Sample<C>>>,
        diagnostics: Arc<PipelineDiagnostics>,
    ) -> Self {
        Self {
            period,
            source: Some(source),
            queue,
            diagnostics,
            shutdown: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the producer thread. No-op when already running.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let Some(source) = self.source.take() else {
            return;
        };
        let period = self.period;
        let queue = Arc::clone(&self.queue);
        let diagnostics = Arc::clone(&self.diagnostics);
        let shutdown = Arc::clone(&self.shutdown);
        self.handle = Some(thread::spawn(move || {
            produce_loop(period, source, queue, diagnostics, shutdown)
        }));
    }

    /// Signal the thread and wait for it to exit. Guarantees no sample is
    /// produced after this returns.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.shutdown.store(true, Ordering::Relaxed);
        match handle.join() {
            Ok(source) => self.source = Some(source),
            Err(_) => log::error!("sample producer thread panicked"),
        }
        self.shutdown.store(false, Ordering::Relaxed);
    }
}

impl<S, const C: usize> Drop for SampleProducer<S, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.shutdown.store(true, Ordering::Relaxed);
            let _ = handle.join();
        }
    }
}

fn produce_loop<S, const C: usize>(
    period: Duration,
    mut source: S,
    queue: Arc<DoubleBufferedQueue<Sample<C>>>,
    diagnostics: Arc<PipelineDiagnostics>,
    shutdown: Arc<AtomicBool>,
) -> S
where
    S: SampleSource<C>,
{
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

        // After a stall, resume at the nominal cadence instead of replaying
        // the missed ticks.
        next_tick += period;
        let now = Instant::now();
        if next_tick <= now {
            next_tick = now + period;
        }
        thread::sleep(next_tick - now);
    }
    source
}
