//! Seed entry from free-form text.

use rand::Rng;

/// Upper bound (inclusive) for seeds picked when the input is not a number.
pub const MAX_RANDOM_SEED: u64 = 1_000_000;

/// Parse a user-entered seed.
///
/// Decimal integers are used as-is (negative values are reinterpreted as
/// their two's-complement `u64`). Empty or unparsable input picks a random
/// seed in `[0, MAX_RANDOM_SEED]` from `rng`.
pub fn parse_seed<R: Rng + ?Sized>(input: &str, rng: &mut R) -> u64 {
    let trimmed = input.trim();
    if let Ok(seed) = trimmed.parse::<u64>() {
        return seed;
    }
    if let Ok(seed) = trimmed.parse::<i64>() {
        return seed as u64;
    }
    let seed = rng.random_range(0..=MAX_RANDOM_SEED);
    if !trimmed.is_empty() {
        log::warn!("seed {trimmed:?} is not an integer, using random seed {seed}");
    }
    seed
}
