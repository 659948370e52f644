//! Rounding policy for finalized percentages.
//!
//! Every score and retention value the engine reports goes through
//! round-half-to-even, applied once at finalization. Intermediate
//! arithmetic stays in floating point.

/// Round to the nearest integer, ties to the even neighbor.
pub fn round_half_to_even(value: f64) -> i64 {
    let floor = value.floor();
    let below = floor as i64;
    let frac = value - floor;

    if (frac - 0.5).abs() < 1e-9 {
        if below % 2 == 0 {
            below
        } else {
            below + 1
        }
    } else if frac > 0.5 {
        below + 1
    } else {
        below
    }
}

/// Finalize a correct/total ratio as a 0-100 percentage.
///
/// A zero denominator yields 0, never a division error.
pub fn percentage(numerator: usize, denominator: usize) -> u8 {
    if denominator == 0 {
        return 0;
    }
    round_half_to_even(100.0 * numerator as f64 / denominator as f64) as u8
}
