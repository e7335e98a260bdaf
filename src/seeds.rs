//! Seed management for city generation
//!
//! Every geometry decision is a draw from one deterministic stream. The stream
//! is reached through [`RandomStream`] so generation code never touches an
//! ambient generator and tests can script the exact draws they need.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the uniform draws the generator consumes.
pub trait RandomStream {
    /// Uniform value in `[0, 1)`
    fn next_float(&mut self) -> f64;

    /// Uniform integer in `[0, bound)`. A zero bound yields zero.
    fn next_int(&mut self, bound: u32) -> u32;
}

/// The production stream: ChaCha8 seeded once from a 64-bit integer.
#[derive(Clone, Debug)]
pub struct SeedSource {
    seed: i64,
    rng: ChaCha8Rng,
}

impl SeedSource {
    pub fn new(seed: i64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }

    /// The seed this stream was created from
    pub fn seed(&self) -> i64 {
        self.seed
    }
}

impl RandomStream for SeedSource {
    fn next_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn next_int(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }
}

/// Where the seed of a run came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeedOrigin {
    /// Parsed from the command line
    Supplied,
    /// Derived from the wall clock because no seed was given
    Clock,
    /// The supplied text was not an integer; the fallback value was used
    Fallback { input: String, reason: String },
}

/// A resolved seed plus how it was obtained
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedChoice {
    pub seed: i64,
    pub origin: SeedOrigin,
}

/// Seed used when the supplied argument cannot be parsed
pub const FALLBACK_SEED: i64 = 0;

impl SeedChoice {
    /// Resolve the seed from an optional command-line argument.
    ///
    /// A malformed argument is reported through the returned origin and the
    /// run carries on with [`FALLBACK_SEED`].
    pub fn resolve(arg: Option<&str>) -> Self {
        match arg {
            None => Self {
                seed: seed_from_clock(),
                origin: SeedOrigin::Clock,
            },
            Some(text) => match text.trim().parse::<i64>() {
                Ok(seed) => Self {
                    seed,
                    origin: SeedOrigin::Supplied,
                },
                Err(e) => {
                    log::warn!("seed {:?} is not an integer ({}), using {}", text, e, FALLBACK_SEED);
                    Self {
                        seed: FALLBACK_SEED,
                        origin: SeedOrigin::Fallback {
                            input: text.to_string(),
                            reason: e.to_string(),
                        },
                    }
                }
            },
        }
    }
}

/// Nanoseconds since the Unix epoch, the only entropy a fresh run uses
pub fn seed_from_clock() -> i64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros())
}

impl std::fmt::Display for SeedChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.origin {
            SeedOrigin::Supplied => write!(f, "Reused seed = {}", self.seed),
            SeedOrigin::Clock => write!(f, "New seed = {}", self.seed),
            SeedOrigin::Fallback { input, reason } => write!(
                f,
                "Invalid seed {:?} ({}), using seed = {}",
                input, reason, self.seed
            ),
        }
    }
}

/// Replays a fixed list of draws. Panics when exhausted.
#[cfg(test)]
pub(crate) struct ScriptedStream {
    floats: std::collections::VecDeque<f64>,
    ints: std::collections::VecDeque<u32>,
}

#[cfg(test)]
impl ScriptedStream {
    pub(crate) fn new(floats: &[f64], ints: &[u32]) -> Self {
        Self {
            floats: floats.iter().copied().collect(),
            ints: ints.iter().copied().collect(),
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.floats.is_empty() && self.ints.is_empty()
    }
}

#[cfg(test)]
impl RandomStream for ScriptedStream {
    fn next_float(&mut self) -> f64 {
        self.floats.pop_front().expect("scripted float draws exhausted")
    }

    fn next_int(&mut self, bound: u32) -> u32 {
        let v = self.ints.pop_front().expect("scripted int draws exhausted");
        assert!(v < bound, "scripted int {} out of bound {}", v, bound);
        v
    }
}
