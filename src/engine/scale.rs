//! Margin scale factor
//!
//! Decisive results move ratings further than narrow ones. The table follows
//! the World Football Elo Ratings goal-difference multiplier.

/// Map a score margin to a rating-change multiplier
///
/// Margins of 0 and 1 are neutral, 2 is worth half again as much, and wider
/// margins grow linearly as `(margin + 11) / 8`.
pub fn scale_factor(margin: u64) -> f64 {
    match margin {
        0 | 1 => 1.0,
        2 => 1.5,
        n => (n as f64 + 11.0) / 8.0,
    }
}
