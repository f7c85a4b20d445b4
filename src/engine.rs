//! Engine facade
//!
//! The operations any front end calls: everything mutating goes through
//! here so a match, combine, or add is computed against the in-memory store
//! and persisted in one step.

use crate::config::{validate_config, AppConfig, RankTable, RatingConfig};
use crate::error::LadderError;
use crate::game;
use crate::rating;
use crate::store::{codec, PlayerStore};
use crate::types::{BestPlayers, MatchReport, PlayerRecord, PlayerRow, PlayerStats};
use std::path::PathBuf;

/// The rating and ranking engine around one player store
#[derive(Debug)]
pub struct LadderEngine {
    store: PlayerStore,
    config: AppConfig,
    store_path: PathBuf,
}

impl LadderEngine {
    /// Create an engine with an empty store; call [`load`](Self::load) to
    /// read the store file
    pub fn new(config: AppConfig) -> crate::error::Result<Self> {
        validate_config(&config)?;
        let store_path = PathBuf::from(&config.store.file);
        Ok(Self {
            store: PlayerStore::new(),
            config,
            store_path,
        })
    }

    /// Replace the in-memory store with the persisted one
    pub fn load(&mut self) -> crate::error::Result<()> {
        self.store = codec::load(&self.store_path, &self.config.rating, &self.config.ranks)?;
        Ok(())
    }

    /// Refresh every record and write the store file atomically
    pub fn save(&mut self) -> crate::error::Result<()> {
        self.store.refresh_all(&self.config.ranks);
        codec::save(&self.store_path, &self.store, &self.config.ranks)
    }

    /// Fetch a record by name, creating it with defaults if new
    pub fn get_or_create(&mut self, name: &str) -> &PlayerRecord {
        self.store
            .get_or_create(name, &self.config.rating, &self.config.ranks)
    }

    /// Process one match line and persist the result.
    ///
    /// On rejection (unknown win type, no participants) the store is left
    /// untouched and nothing is written.
    pub fn process_match(&mut self, raw: &str) -> crate::error::Result<MatchReport> {
        let report = game::process_match(
            &mut self.store,
            raw,
            &self.config.rating,
            &self.config.ranks,
        )?;
        self.save()?;
        Ok(report)
    }

    /// Ordered listing rows, optionally filtered to one tier
    pub fn list_players(&self, filter_tier: Option<&str>) -> crate::error::Result<Vec<PlayerRow>> {
        self.store.list_players(filter_tier, &self.config.ranks)
    }

    /// Leaders across the tracked dimensions
    pub fn best_players(&self) -> BestPlayers {
        self.store
            .best_players(self.config.store.min_games_for_win_rate)
    }

    /// Merge player B into player A and persist
    pub fn combine(&mut self, name_a: &str, name_b: &str) -> crate::error::Result<()> {
        self.store.combine(name_a, name_b, &self.config.ranks)?;
        self.save()
    }

    /// Manually add a player (optionally with a full stat tuple) and persist
    pub fn add(&mut self, name: &str, stats: Option<PlayerStats>) -> crate::error::Result<()> {
        self.store
            .add(name, stats, &self.config.rating, &self.config.ranks)?;
        self.save()
    }

    /// Expected win rate of one existing player over another, from their
    /// average ratings, as a percentage
    pub fn expected_win_rate(&self, name_a: &str, name_b: &str) -> crate::error::Result<f64> {
        let a = self.store.get(name_a).ok_or_else(|| LadderError::PlayerNotFound {
            name: name_a.to_string(),
        })?;
        let b = self.store.get(name_b).ok_or_else(|| LadderError::PlayerNotFound {
            name: name_b.to_string(),
        })?;
        Ok(rating::expected_win_rate(a.avg as f64, b.avg as f64))
    }

    /// All display names, sorted
    pub fn names(&self) -> Vec<String> {
        self.store.names()
    }

    pub fn player_count(&self) -> usize {
        self.store.len()
    }

    /// Read access to the underlying store
    pub fn store(&self) -> &PlayerStore {
        &self.store
    }

    pub fn rank_table(&self) -> &RankTable {
        &self.config.ranks
    }

    pub fn rating_config(&self) -> &RatingConfig {
        &self.config.rating
    }
}
