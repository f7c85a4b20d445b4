//! Rating system configuration
//!
//! K-factor, rating bounds, win-type multipliers, and the rank-protection
//! bands are all configuration data. The defaults below are the reference
//! set; alternative tables load from the same config file as everything
//! else and pass through the same validation.

use serde::{Deserialize, Serialize};

/// Multiplier applied to the raw Elo delta for one win-type keyword
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinTypeMultiplier {
    pub keyword: String,
    pub multiplier: f64,
}

/// One band of the rank-protection table.
///
/// Bands are ordered by ascending ceiling; a player's current rating selects
/// the first band whose ceiling it does not exceed. `max_rating: None` marks
/// the catch-all band for elite ratings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionBand {
    pub max_rating: Option<i32>,
    pub bonus: i32,
}

impl ProtectionBand {
    fn new(max_rating: Option<i32>, bonus: i32) -> Self {
        Self { max_rating, bonus }
    }
}

/// Rating update configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub k_factor: f64,
    /// Starting rating for new players and the hard floor
    pub rating_min: i32,
    /// Hard ceiling for any rating
    pub rating_max: i32,
    /// Effective opponent rating when the opposing side lists nobody at all.
    /// The source variants disagree on this value (100, 150, and 1500 all
    /// appear); it is an explicit constant here rather than a baked-in pick.
    pub neutral_opponent_rating: i32,
    /// Win-type keyword table, matched case-insensitively
    pub win_multipliers: Vec<WinTypeMultiplier>,
    /// Rank-protection bands, ascending by ceiling
    pub protection: Vec<ProtectionBand>,
}

impl Default for RatingConfig {
    fn default() -> Self {
        let win_multipliers = [
            ("win", 1.0),
            ("smallwin", 0.75),
            ("closewin", 0.5),
            ("bigwin", 1.25),
            ("perfectwin", 1.5),
        ]
        .into_iter()
        .map(|(keyword, multiplier)| WinTypeMultiplier {
            keyword: keyword.to_string(),
            multiplier,
        })
        .collect();

        // Cushion for low ratings, shrinking to a small deduction at the top
        let protection = vec![
            ProtectionBand::new(Some(150), 34),
            ProtectionBand::new(Some(200), 21),
            ProtectionBand::new(Some(400), 13),
            ProtectionBand::new(Some(850), 8),
            ProtectionBand::new(Some(1234), 5),
            ProtectionBand::new(Some(1650), 3),
            ProtectionBand::new(Some(2222), 2),
            ProtectionBand::new(Some(2468), 1),
            ProtectionBand::new(Some(2666), 0),
            ProtectionBand::new(Some(2900), -1),
            ProtectionBand::new(None, -2),
        ];

        Self {
            k_factor: 32.0,
            rating_min: 100,
            rating_max: 2999,
            neutral_opponent_rating: 100,
            win_multipliers,
            protection,
        }
    }
}

impl RatingConfig {
    /// Look up the delta multiplier for a win-type keyword
    pub fn multiplier_for(&self, keyword: &str) -> Option<f64> {
        let keyword = keyword.to_lowercase();
        self.win_multipliers
            .iter()
            .find(|w| w.keyword == keyword)
            .map(|w| w.multiplier)
    }

    /// Whether `token` names a configured win type
    pub fn is_win_type(&self, token: &str) -> bool {
        self.multiplier_for(token).is_some()
    }

    /// Protection bonus for a player's current rating: the first band whose
    /// ceiling the rating does not exceed
    pub fn protection_bonus(&self, current: i32) -> i32 {
        self.protection
            .iter()
            .find(|band| band.max_rating.map_or(true, |max| current <= max))
            .map(|band| band.bonus)
            .unwrap_or(0)
    }

    /// Clamp a rating into the configured bounds
    pub fn clamp(&self, rating: i32) -> i32 {
        rating.clamp(self.rating_min, self.rating_max)
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.k_factor <= 0.0 {
            return Err(crate::error::LadderError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }
        if self.rating_min >= self.rating_max {
            return Err(crate::error::LadderError::ConfigurationError {
                message: format!(
                    "rating_min ({}) must be below rating_max ({})",
                    self.rating_min, self.rating_max
                ),
            }
            .into());
        }
        if self.win_multipliers.is_empty() {
            return Err(crate::error::LadderError::ConfigurationError {
                message: "At least one win type must be configured".to_string(),
            }
            .into());
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &self.win_multipliers {
            if entry.keyword != entry.keyword.to_lowercase() {
                return Err(crate::error::LadderError::ConfigurationError {
                    message: format!("Win type keywords must be lowercase: {}", entry.keyword),
                }
                .into());
            }
            if !seen.insert(entry.keyword.as_str()) {
                return Err(crate::error::LadderError::ConfigurationError {
                    message: format!("Duplicate win type keyword: {}", entry.keyword),
                }
                .into());
            }
            if entry.multiplier <= 0.0 {
                return Err(crate::error::LadderError::ConfigurationError {
                    message: format!("Win type multiplier must be positive: {}", entry.keyword),
                }
                .into());
            }
        }

        let mut last_ceiling: Option<i32> = None;
        for (idx, band) in self.protection.iter().enumerate() {
            match band.max_rating {
                Some(max) => {
                    if let Some(prev) = last_ceiling {
                        if max <= prev {
                            return Err(crate::error::LadderError::ConfigurationError {
                                message: format!(
                                    "Protection ceilings must be strictly ascending ({prev} then {max})"
                                ),
                            }
                            .into());
                        }
                    }
                    last_ceiling = Some(max);
                }
                None => {
                    if idx != self.protection.len() - 1 {
                        return Err(crate::error::LadderError::ConfigurationError {
                            message: "Only the last protection band may be the catch-all"
                                .to_string(),
                        }
                        .into());
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(RatingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_multiplier_lookup() {
        let config = RatingConfig::default();
        assert_eq!(config.multiplier_for("win"), Some(1.0));
        assert_eq!(config.multiplier_for("PerfectWin"), Some(1.5));
        assert_eq!(config.multiplier_for("closewin"), Some(0.5));
        assert_eq!(config.multiplier_for("loss"), None);
        assert!(config.is_win_type("bigwin"));
        assert!(!config.is_win_type("draw"));
    }

    #[test]
    fn test_protection_bands_reference_values() {
        let config = RatingConfig::default();
        assert_eq!(config.protection_bonus(100), 34);
        assert_eq!(config.protection_bonus(150), 34);
        assert_eq!(config.protection_bonus(151), 21);
        assert_eq!(config.protection_bonus(400), 13);
        assert_eq!(config.protection_bonus(2666), 0);
        assert_eq!(config.protection_bonus(2700), -1);
        assert_eq!(config.protection_bonus(2950), -2);
    }

    #[test]
    fn test_validate_rejects_bad_bands() {
        let mut config = RatingConfig::default();
        config.protection = vec![
            ProtectionBand::new(Some(200), 21),
            ProtectionBand::new(Some(150), 34),
        ];
        assert!(config.validate().is_err());

        config.protection = vec![
            ProtectionBand::new(None, -2),
            ProtectionBand::new(Some(150), 34),
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_keyword() {
        let mut config = RatingConfig::default();
        config.win_multipliers.push(WinTypeMultiplier {
            keyword: "win".to_string(),
            multiplier: 2.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp() {
        let config = RatingConfig::default();
        assert_eq!(config.clamp(50), 100);
        assert_eq!(config.clamp(3200), 2999);
        assert_eq!(config.clamp(1500), 1500);
    }
}
