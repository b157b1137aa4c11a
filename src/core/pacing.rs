use log::trace;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PausePolicy {
    Fixed(Duration),
    /// `base + step * attempt`
    Linear { base: Duration, step: Duration },
    /// `base` plus a uniform draw from `[0, spread)`
    Jitter { base: Duration, spread: Duration },
}

impl PausePolicy {
    pub fn calculate_pause<R: Rng + ?Sized>(&self, attempt: usize, rng: &mut R) -> Duration {
        match *self {
            PausePolicy::Fixed(delay) => delay,
            PausePolicy::Linear { base, step } => base + step * attempt as u32,
            PausePolicy::Jitter { base, spread } => {
                if spread.is_zero() {
                    base
                } else {
                    base + spread.mul_f64(rng.gen::<f64>())
                }
            }
        }
    }
}

/// Owns the randomness behind every pause and scroll offset of a run.
pub struct Pacer {
    rng: Mutex<StdRng>,
}

impl Pacer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn pause_for(&self, policy: &PausePolicy, attempt: usize) -> Duration {
        policy.calculate_pause(attempt, &mut *self.rng.lock())
    }

    pub async fn pause(&self, policy: &PausePolicy, attempt: usize) {
        let delay = self.pause_for(policy, attempt);
        trace!("Pausing for {:?} (attempt {})", delay, attempt);
        sleep(delay).await;
    }

    /// Uniform offset in `[0, max)` pixels.
    pub fn jitter_px(&self, max: f64) -> f64 {
        if max <= 0.0 {
            return 0.0;
        }
        self.rng.lock().gen_range(0.0..max)
    }
}
