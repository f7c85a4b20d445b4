//! Rank threshold table configuration
//!
//! The tier names, thresholds, sentinel tokens, and legacy aliases are all
//! data: the reference set below ships as the default, and any table that
//! passes validation can be loaded from a config file instead.

use crate::types::Rank;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the threshold table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankTier {
    /// Minimum score required to classify into this tier
    pub min_score: i32,
    pub name: String,
}

impl RankTier {
    fn new(min_score: i32, name: &str) -> Self {
        Self {
            min_score,
            name: name.to_string(),
        }
    }
}

/// Ordered rank classification table plus the sentinel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankTable {
    /// Tiers in strictly descending threshold order; the last entry is the
    /// catch-all lowest tier
    pub tiers: Vec<RankTier>,
    /// File token for the hidden sentinel rank
    pub hidden_token: String,
    /// File token for the special sentinel rank
    pub special_token: String,
    /// Fixed label the special rank renders as
    pub special_label: String,
    /// Names whose canonical key contains this substring are created with
    /// all ranks hidden
    pub reserved_substring: String,
    /// Legacy single-letter rank tokens accepted by the loader
    pub aliases: HashMap<String, String>,
}

impl Default for RankTable {
    fn default() -> Self {
        let tiers = vec![
            RankTier::new(2999, "ultra"),
            RankTier::new(2900, "grand-master"),
            RankTier::new(2666, "super-master"),
            RankTier::new(2468, "master"),
            RankTier::new(2222, "diamond"),
            RankTier::new(1650, "emerald"),
            RankTier::new(1234, "jade"),
            RankTier::new(850, "plat"),
            RankTier::new(450, "gold"),
            RankTier::new(250, "silver"),
            RankTier::new(200, "copper"),
            RankTier::new(150, "bronze"),
            RankTier::new(125, "steel"),
            RankTier::new(99, "iron"),
        ];

        let aliases = [
            ("i", "iron"),
            ("t", "steel"),
            ("c", "copper"),
            ("s", "silver"),
            ("g", "gold"),
            ("p", "plat"),
            ("j", "jade"),
            ("e", "emerald"),
            ("d", "diamond"),
            ("m", "master"),
            ("r", "grand-master"),
            ("u", "ultra"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            tiers,
            hidden_token: "lz".to_string(),
            special_token: "im".to_string(),
            special_label: "importal".to_string(),
            reserved_substring: "zhong".to_string(),
            aliases,
        }
    }
}

impl RankTable {
    /// Classify a score into the first tier whose threshold it meets,
    /// falling through to the catch-all lowest tier
    pub fn classify(&self, score: i32) -> Rank {
        for tier in &self.tiers {
            if score >= tier.min_score {
                return Rank::Tier(tier.name.clone());
            }
        }
        Rank::Tier(self.lowest_tier().to_string())
    }

    /// Name of the catch-all lowest tier
    pub fn lowest_tier(&self) -> &str {
        self.tiers.last().map(|t| t.name.as_str()).unwrap_or("")
    }

    /// Total order value used for "did this improve" comparisons.
    ///
    /// Sentinels order as the top normal tier, so normal classification can
    /// never outrank them.
    pub fn order_of(&self, rank: &Rank) -> usize {
        match rank {
            Rank::Hidden | Rank::Special => self.top_order(),
            Rank::Tier(name) => self
                .tiers
                .iter()
                .position(|t| t.name == *name)
                .map(|pos| self.tiers.len() - 1 - pos)
                .unwrap_or(0),
        }
    }

    /// Order value of the highest normal tier
    pub fn top_order(&self) -> usize {
        self.tiers.len() - 1
    }

    /// Whether `name` is a normal tier of this table
    pub fn is_tier(&self, name: &str) -> bool {
        self.tiers.iter().any(|t| t.name == name)
    }

    /// Parse a persisted rank token, expanding legacy aliases.
    ///
    /// Returns `None` for unrecognized tokens; the loader re-derives those
    /// from the numeric scores instead of failing.
    pub fn parse_token(&self, token: &str) -> Option<Rank> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if token == self.hidden_token {
            return Some(Rank::Hidden);
        }
        if token == self.special_token {
            return Some(Rank::Special);
        }
        if self.is_tier(token) {
            return Some(Rank::Tier(token.to_string()));
        }
        self.aliases
            .get(token)
            .filter(|full| self.is_tier(full.as_str()))
            .map(|full| Rank::Tier(full.clone()))
    }

    /// Stable file token for a rank (the inverse of [`parse_token`])
    pub fn token_for(&self, rank: &Rank) -> String {
        match rank {
            Rank::Hidden => self.hidden_token.clone(),
            Rank::Special => self.special_token.clone(),
            Rank::Tier(name) => name.clone(),
        }
    }

    /// Validate table shape: non-empty, strictly descending thresholds,
    /// unique names, sentinel tokens distinct from tier names
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.tiers.is_empty() {
            return Err(crate::error::LadderError::ConfigurationError {
                message: "Rank table must have at least one tier".to_string(),
            }
            .into());
        }

        for pair in self.tiers.windows(2) {
            if pair[0].min_score <= pair[1].min_score {
                return Err(crate::error::LadderError::ConfigurationError {
                    message: format!(
                        "Rank thresholds must be strictly descending: {} ({}) then {} ({})",
                        pair[0].name, pair[0].min_score, pair[1].name, pair[1].min_score
                    ),
                }
                .into());
            }
        }

        let mut seen = std::collections::HashSet::new();
        for tier in &self.tiers {
            if !seen.insert(tier.name.as_str()) {
                return Err(crate::error::LadderError::ConfigurationError {
                    message: format!("Duplicate rank tier name: {}", tier.name),
                }
                .into());
            }
        }

        if self.hidden_token == self.special_token {
            return Err(crate::error::LadderError::ConfigurationError {
                message: "Hidden and special rank tokens must differ".to_string(),
            }
            .into());
        }
        for token in [&self.hidden_token, &self.special_token] {
            if self.is_tier(token) {
                return Err(crate::error::LadderError::ConfigurationError {
                    message: format!("Sentinel token collides with a tier name: {token}"),
                }
                .into());
            }
        }

        Ok(())
    }
}
