use rand::Rng;

/// Supplies uniform samples for the cumulative-weight scan.
pub trait RandomSource {
    /// A uniform integer in `0..total`. `total` is always greater than zero.
    fn sample(&mut self, total: u64) -> u64;
}

/// Draws from the thread-local RNG, which is seeded from OS entropy.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn sample(&mut self, total: u64) -> u64 {
        rand::thread_rng().gen_range(0..total)
    }
}

///
/// Replays a fixed list of samples in order, then falls back to the thread RNG.
///
/// Scripted samples are returned as given, even when they fall outside
/// `0..total`, so callers can exercise out-of-range handling.
///
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<u64>,
    index: usize,
}

impl ScriptedSource {
    pub fn new(samples: Vec<u64>) -> Self {
        log::debug!("Scripted samples: {:?}", samples);
        ScriptedSource { samples, index: 0 }
    }

    /// Number of samples drawn so far, scripted or not.
    pub fn drawn(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.samples.len().saturating_sub(self.index)
    }
}

impl RandomSource for ScriptedSource {
    fn sample(&mut self, total: u64) -> u64 {
        let scripted = self.samples.get(self.index).copied();
        if scripted.is_none() && self.index == self.samples.len() {
            log::warn!(
                "Scripted samples used up after {} draws, falling back to the thread RNG",
                self.index
            );
        }
        self.index += 1;
        scripted.unwrap_or_else(|| ThreadRngSource.sample(total))
    }
}
