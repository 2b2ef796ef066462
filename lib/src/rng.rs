//! Seeded random number generation.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build the generator behind every random choice in the crate.
///
/// `Some(seed)` makes splits, bootstraps and feature draws reproducible.
/// `None` seeds from OS entropy, so repeated runs differ.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
