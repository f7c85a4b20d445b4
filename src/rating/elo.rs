//! Elo-style rating updates with rank protection
//!
//! The expected score comes from the classic logistic curve via the
//! skillratings crate; the win-type multiplier, rank-protection bands, and
//! floor/ceiling clamps are layered on top of it.

use crate::config::RatingConfig;
use crate::types::Outcome;
use skillratings::elo::{expected_score, EloRating};

/// Expected score for `current` against `opponent_rating` (0.0..=1.0)
fn expectation(current: f64, opponent_rating: f64) -> f64 {
    let player = EloRating { rating: current };
    let opponent = EloRating {
        rating: opponent_rating,
    };
    let (expected, _) = expected_score(&player, &opponent);
    expected
}

/// Expected win rate of `player_rating` over `opponent_rating`,
/// as a percentage
pub fn expected_win_rate(player_rating: f64, opponent_rating: f64) -> f64 {
    expectation(player_rating, opponent_rating) * 100.0
}

/// Compute the post-match rating for one participant.
///
/// Returns `(new_rating, delta)` with `delta = new_rating - current`.
/// The combined delta of a loss is clamped to be at most zero: protection
/// can soften a loss but never turn it into a gain. A negative delta at the
/// rating floor is swallowed entirely.
pub fn update(
    current: i32,
    outcome: Outcome,
    opponent_rating: f64,
    multiplier: f64,
    config: &RatingConfig,
) -> (i32, i32) {
    let expected = expectation(current as f64, opponent_rating);
    let mut change = multiplier * config.k_factor * (outcome.score() - expected);

    change += config.protection_bonus(current) as f64;
    if outcome == Outcome::Loss {
        change = change.min(0.0);
    }

    if change < 0.0 && current <= config.rating_min {
        return (config.rating_min, 0);
    }

    let new_rating = config.clamp((current as f64 + change).round() as i32);
    (new_rating, new_rating - current)
}
