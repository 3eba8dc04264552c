//! Pairwise delta computation
//!
//! The logistic expectation comes from the skillratings Elo implementation;
//! the margin scale factor, rounding policy, and draw handling are layered on
//! top of it.

use crate::config::{EngineConfig, RoundingRule};
use crate::engine::scale::scale_factor;
use crate::types::Rating;
use skillratings::elo::EloRating;

/// Expected score of the first rating against the second
///
/// `1 / (1 + 10^((b - a) / 400))`, always in (0, 1).
pub fn expected_score(rating_a: Rating, rating_b: Rating) -> f64 {
    let (expected_a, _expected_b) = skillratings::elo::expected_score(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
    );
    expected_a
}

/// Round a raw delta to a whole point under the configured rule
pub fn round_delta(value: f64, rule: RoundingRule) -> f64 {
    match rule {
        RoundingRule::HalfToEven => value.round_ties_even(),
        RoundingRule::HalfAwayFromZero => value.round(),
    }
}

/// Rating points the winner gains (and the loser loses) for a decided match
pub fn rating_delta(
    winner_rating: Rating,
    loser_rating: Rating,
    margin: u64,
    config: &EngineConfig,
) -> f64 {
    let scale = scale_factor(margin);
    let expect = expected_score(winner_rating, loser_rating);
    round_delta(config.k_factor * scale * (1.0 - expect), config.rounding)
}

/// Rating points side A gains (and side B loses) for a drawn match
///
/// A draw corrects toward a 0.5 expectation instead of a full swing: the
/// favorite gives up points, the underdog collects them. Negating the result
/// yields side B's delta, so the pair stays zero-sum under either rounding
/// rule.
pub fn draw_delta(
    rating_a: Rating,
    rating_b: Rating,
    margin: u64,
    config: &EngineConfig,
) -> f64 {
    let scale = scale_factor(margin);
    let expect = expected_score(rating_a, rating_b);
    round_delta(config.k_factor * scale * (0.5 - expect), config.rounding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_k(k: f64) -> EngineConfig {
        EngineConfig {
            k_factor: k,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_expected_score_is_half_for_equal_ratings() {
        assert!((expected_score(1500.0, 1500.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_expected_score_favors_higher_rating() {
        let strong = expected_score(1700.0, 1500.0);
        let weak = expected_score(1500.0, 1700.0);
        assert!(strong > 0.5);
        assert!(weak < 0.5);
        assert!((strong + weak - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_worked_example_k32_margin_two() {
        // Equal 1500s, margin 2: expect = 0.5, delta = round(32 * 1.5 * 0.5)
        let delta = rating_delta(1500.0, 1500.0, 2, &config_with_k(32.0));
        assert_eq!(delta, 24.0);
    }

    #[test]
    fn test_rounding_rules_differ_on_exact_halves() {
        // Equal ratings, margin 1: raw delta = 17 * 1.0 * 0.5 = 8.5
        let mut config = config_with_k(17.0);

        config.rounding = RoundingRule::HalfToEven;
        assert_eq!(rating_delta(1500.0, 1500.0, 1, &config), 8.0);

        config.rounding = RoundingRule::HalfAwayFromZero;
        assert_eq!(rating_delta(1500.0, 1500.0, 1, &config), 9.0);
    }

    #[test]
    fn test_delta_is_bounded_by_k_times_scale() {
        let config = config_with_k(32.0);
        for margin in 0..12 {
            for (winner, loser) in [(1200.0, 1900.0), (1900.0, 1200.0), (1500.0, 1500.0)] {
                let delta = rating_delta(winner, loser, margin, &config);
                assert!(delta.abs() <= config.k_factor * scale_factor(margin));
            }
        }
    }

    #[test]
    fn test_draw_delta_moves_favorite_down() {
        let config = config_with_k(20.0);
        // The higher-rated side loses points on a draw
        let favorite_view = draw_delta(1700.0, 1500.0, 0, &config);
        assert!(favorite_view < 0.0);
        // And the symmetric view is the exact negation
        let underdog_view = draw_delta(1500.0, 1700.0, 0, &config);
        assert_eq!(underdog_view, -favorite_view);
    }

    #[test]
    fn test_draw_delta_is_zero_for_equal_ratings() {
        let config = config_with_k(20.0);
        assert_eq!(draw_delta(1500.0, 1500.0, 0, &config), 0.0);
    }
}
