use std::ops::RangeInclusive;

use rand::Rng;

/// Rounds to 2 decimal places (cents).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Draws uniformly from an inclusive `(min, max)` pair.
///
/// Degenerate pairs (`min == max`) always return `min`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    rng.random_range(min..=max)
}

/// Draws a count uniformly from an inclusive range.
pub fn uniform_count<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<usize>) -> usize {
    if range.is_empty() {
        return *range.start();
    }
    rng.random_range(range)
}
