//! Utility functions for the ladder engine

/// Canonicalize a display name into a stable lookup key.
///
/// Lowercases and strips every character that is not a letter or digit,
/// so spelling variants of the same name resolve to one player.
pub fn canonicalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Derived win rate as a whole percentage (0 when no games played)
pub fn win_rate_percent(wins: u32, played: u32) -> u32 {
    if played == 0 {
        return 0;
    }
    ((wins as f64 / played as f64) * 100.0).round() as u32
}

/// Reconstruct a wins count from a stored win-rate percentage.
///
/// The inverse of [`win_rate_percent`]; lossy for small `played` counts,
/// which the persistence format tolerates.
pub fn wins_from_rate(win_rate: u32, played: u32) -> u32 {
    if played == 0 {
        return 0;
    }
    ((win_rate as f64 / 100.0) * played as f64).round() as u32
}

/// Mean of a set of ratings, `None` when empty
pub fn mean_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64)
}
