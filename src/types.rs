//! Common types used throughout the ladder engine

use serde::{Deserialize, Serialize};

/// Canonical lookup key for a player (lowercase alphanumeric)
pub type PlayerKey = String;

/// Which side of the table a participant played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Offense,
    Defense,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Offense => write!(f, "offense"),
            Role::Defense => write!(f, "defense"),
        }
    }
}

/// Match outcome from one participant's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Actual score fed into the Elo formula (1 = win, 0 = loss)
    pub fn score(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
        }
    }
}

/// A rank tier as stored on a player record.
///
/// `Tier` holds a name from the configured threshold table. The two
/// sentinels sit outside normal classification: once set they are never
/// overwritten, and both order as the top normal tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Tier(String),
    /// Rendered as a freshly randomized opaque code at display time
    Hidden,
    /// Rendered as a fixed label
    Special,
}

impl Rank {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Rank::Hidden | Rank::Special)
    }
}

/// One player's aggregate ladder state (one record per canonical identity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// First-seen human-readable name, preserved verbatim across merges
    pub display: String,
    pub offense: i32,
    pub defense: i32,
    /// Derived: `round((offense + defense) / 2)`
    pub avg: i32,
    pub played: u32,
    pub wins: u32,
    /// Highest tier ever attained by each dimension (monotonic non-decreasing)
    pub rank_o: Rank,
    pub rank_d: Rank,
    pub rank_a: Rank,
}

impl PlayerRecord {
    /// Recompute the derived average from the current role ratings
    pub fn recompute_avg(&mut self) {
        self.avg = ((self.offense + self.defense) as f64 / 2.0).round() as i32;
    }

    /// Derived win rate as a whole percentage
    pub fn win_rate(&self) -> u32 {
        crate::utils::win_rate_percent(self.wins, self.played)
    }
}

/// Raw stat tuple accepted by the manual add operation,
/// mirroring the persisted field layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub offense: i32,
    pub defense: i32,
    pub played: u32,
    pub win_rate: u32,
}

/// Rating movement for one participant of a processed match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingLine {
    pub display: String,
    pub role: Role,
    pub outcome: Outcome,
    pub old_rating: i32,
    pub new_rating: i32,
    pub delta: i32,
}

/// Result of processing one match line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub win_type: String,
    pub multiplier: f64,
    pub lines: Vec<RatingLine>,
}

/// One row of the ordered player listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRow {
    pub position: usize,
    pub display: String,
    pub avg: i32,
    pub offense: i32,
    pub defense: i32,
    pub played: u32,
    pub win_rate: u32,
    /// Overall rank plus side indicator, e.g. `gold(o)`
    pub rank_display: String,
}

/// Leaders across the tracked dimensions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BestPlayers {
    pub best_avg: Option<(String, i32)>,
    pub best_offense: Option<(String, i32)>,
    pub best_defense: Option<(String, i32)>,
    pub most_played: Option<(String, u32)>,
    /// Best win rate among players with at least the configured game count
    pub best_win_rate: Option<(String, u32)>,
}
