use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Supplies one multi-channel reading per producer tick. Hardware polling
/// and synthetic generators both sit behind this; the producer owns the
/// clock and the cadence, the source only produces values. A failed read
/// is a per-tick condition: the producer reports it and keeps its schedule.
pub trait SampleSource<const C: usize>: Send {
    fn read(&mut self) -> Result<[f64; C], SourceError>;
}

/// Two-channel bounded random walk, the synthetic stand-in for a sensor.
///
/// Each step moves by a uniform offset scaled to the sampling period and
/// reflects off the upper limit, so traces wander but stay on the chart.
pub struct RandomWalk {
    rng: StdRng,
    values: [f64; 2],
    upper_limit: f64,
    scale_factor: f64,
}

impl RandomWalk {
    pub fn new(period_ms: u64) -> Self {
        Self::with_seed(period_ms, 9)
    }

    pub fn with_seed(period_ms: u64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            values: [32.0, 63.0],
            upper_limit: 94.0,
            scale_factor: (period_ms as f64 * 0.1).sqrt(),
        }
    }

    fn step(&mut self, value: f64) -> f64 {
        let next = (value + (self.rng.gen::<f64>() - 0.5) * self.scale_factor).abs();
        if next > self.upper_limit {
            self.upper_limit * 2.0 - next
        } else {
            next
        }
    }
}

impl SampleSource<2> for RandomWalk {
    fn read(&mut self) -> Result<[f64; 2], SourceError> {
        self.values = [self.step(self.values[0]), self.step(self.values[1])];
        Ok(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_stays_within_limits() {
        let mut walk = RandomWalk::new(100);
        for _ in 0..10_000 {
            let [a, b] = walk.read().unwrap();
            assert!((0.0..=94.0).contains(&a));
            assert!((0.0..=94.0).contains(&b));
        }
    }

    #[test]
    fn same_seed_replays_the_same_walk() {
        let mut first = RandomWalk::with_seed(100, 42);
        let mut second = RandomWalk::with_seed(100, 42);
        for _ in 0..100 {
            assert_eq!(first.read().unwrap(), second.read().unwrap());
        }
    }
}
