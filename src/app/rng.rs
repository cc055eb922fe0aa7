//! Seeded randomness shared by the planner and the writer.
//!
//! Everything random in a run hangs off one `u64` seed. The planner draws from
//! stream 0 of a ChaCha8 generator; each file's content comes from its own
//! stream (entry index + 1) of the same key, so contents do not depend on
//! which thread writes which file or in what order.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub type SeededRng = ChaCha8Rng;

/// Returns the configured seed, or a fresh one from OS entropy.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

pub fn plan_rng(seed: u64) -> SeededRng {
    SeededRng::seed_from_u64(seed)
}

/// Independent generator for the content of plan entry `index`.
pub fn content_rng(seed: u64, index: usize) -> SeededRng {
    let mut rng = SeededRng::seed_from_u64(seed);
    rng.set_stream(index as u64 + 1);
    rng
}
