//! In-memory player store
//!
//! One record per canonical identity, keyed exclusively by the canonical
//! form of the display name. The store owns creation, merge/combine, and
//! the avg/rank refresh pass; it is passed explicitly to every engine
//! operation rather than living in a process-wide global.

use crate::config::{RankTable, RatingConfig};
use crate::error::LadderError;
use crate::rank;
use crate::types::{BestPlayers, PlayerKey, PlayerRecord, PlayerRow, PlayerStats, Rank};
use crate::utils::{canonicalize, wins_from_rate};
use std::collections::HashMap;

/// Aggregate stats folded into an existing record by the merge path.
/// Absent ranks are re-derived from the blended scores.
#[derive(Debug, Clone)]
pub struct MergeStats {
    pub offense: i32,
    pub defense: i32,
    pub played: u32,
    pub wins: u32,
    pub rank_o: Option<Rank>,
    pub rank_d: Option<Rank>,
    pub rank_a: Option<Rank>,
}

/// A record as recovered from one persisted line, trailing fields optional
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    pub display: String,
    pub offense: i32,
    pub defense: i32,
    pub played: u32,
    pub wins: u32,
    pub avg: Option<i32>,
    pub rank_d: Option<Rank>,
    pub rank_o: Option<Rank>,
    pub rank_a: Option<Rank>,
}

/// Map of canonical key to player record
#[derive(Debug, Clone, Default)]
pub struct PlayerStore {
    players: HashMap<PlayerKey, PlayerRecord>,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Look up a record by display name (any spelling variant)
    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.get(&canonicalize(name))
    }

    pub fn get_by_key(&self, key: &str) -> Option<&PlayerRecord> {
        self.players.get(key)
    }

    pub fn record_mut(&mut self, key: &str) -> Option<&mut PlayerRecord> {
        self.players.get_mut(key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(&canonicalize(name))
    }

    /// Resolve a name to its canonical key, creating a fresh record on first
    /// reference
    pub fn ensure(&mut self, name: &str, rating: &RatingConfig, table: &RankTable) -> PlayerKey {
        let key = canonicalize(name);
        if !self.players.contains_key(&key) {
            let record = new_record(name, &key, rating, table);
            self.players.insert(key.clone(), record);
        }
        key
    }

    /// Fetch a record by name, creating it with defaults if new
    pub fn get_or_create(
        &mut self,
        name: &str,
        rating: &RatingConfig,
        table: &RankTable,
    ) -> &PlayerRecord {
        let key = self.ensure(name, rating, table);
        &self.players[&key]
    }

    /// Blend incoming aggregate stats into the record at `key`.
    ///
    /// Role ratings blend as the play-count-weighted mean of old and
    /// incoming; played and wins sum; each rank dimension keeps whichever
    /// of old/incoming outranks the other.
    pub fn merge(&mut self, key: &str, incoming: MergeStats, table: &RankTable) {
        let Some(old) = self.players.get(key) else {
            return;
        };

        let total_played = old.played + incoming.played;
        let (offense, defense) = if total_played > 0 {
            let blend = |a: i32, b: i32| {
                ((a as f64 * old.played as f64 + b as f64 * incoming.played as f64)
                    / total_played as f64)
                    .round() as i32
            };
            (
                blend(old.offense, incoming.offense),
                blend(old.defense, incoming.defense),
            )
        } else {
            (incoming.offense, incoming.defense)
        };
        let avg = ((offense + defense) as f64 / 2.0).round() as i32;

        let rank_o = incoming
            .rank_o
            .unwrap_or_else(|| table.classify(offense));
        let rank_d = incoming
            .rank_d
            .unwrap_or_else(|| table.classify(defense));
        let rank_a = incoming.rank_a.unwrap_or_else(|| table.classify(avg));

        let merged = PlayerRecord {
            display: old.display.clone(),
            offense,
            defense,
            avg,
            played: total_played,
            wins: old.wins + incoming.wins,
            rank_o: rank::max_rank(old.rank_o.clone(), rank_o, table),
            rank_d: rank::max_rank(old.rank_d.clone(), rank_d, table),
            rank_a: rank::max_rank(old.rank_a.clone(), rank_a, table),
        };
        self.players.insert(key.to_string(), merged);
    }

    /// Absorb a record recovered from the store file, merging on duplicate
    /// canonical keys and re-deriving whatever the line did not carry
    pub fn absorb(&mut self, loaded: LoadedRecord, rating: &RatingConfig, table: &RankTable) {
        let key = canonicalize(&loaded.display);
        if key.is_empty() {
            return;
        }

        let offense = rating.clamp(loaded.offense);
        let defense = rating.clamp(loaded.defense);

        if self.players.contains_key(&key) {
            self.merge(
                &key,
                MergeStats {
                    offense,
                    defense,
                    played: loaded.played,
                    wins: loaded.wins,
                    rank_o: loaded.rank_o,
                    rank_d: loaded.rank_d,
                    rank_a: loaded.rank_a,
                },
                table,
            );
            return;
        }

        let avg = loaded
            .avg
            .unwrap_or_else(|| ((offense + defense) as f64 / 2.0).round() as i32);
        let mut record = PlayerRecord {
            display: loaded.display,
            offense,
            defense,
            avg,
            played: loaded.played,
            wins: loaded.wins,
            rank_o: loaded.rank_o.unwrap_or_else(|| table.classify(offense)),
            rank_d: loaded.rank_d.unwrap_or_else(|| table.classify(defense)),
            rank_a: loaded.rank_a.unwrap_or_else(|| table.classify(avg)),
        };
        apply_reserved_override(&mut record, &key, table);
        self.players.insert(key, record);
    }

    /// Merge player B's aggregate stats into player A, then remove B.
    ///
    /// Rejected with no mutation when either name is unknown or both
    /// canonicalize to the same record.
    pub fn combine(&mut self, name_a: &str, name_b: &str, table: &RankTable) -> crate::error::Result<()> {
        let key_a = canonicalize(name_a);
        let key_b = canonicalize(name_b);

        if !self.players.contains_key(&key_a) {
            return Err(LadderError::PlayerNotFound {
                name: name_a.to_string(),
            }
            .into());
        }
        if !self.players.contains_key(&key_b) {
            return Err(LadderError::PlayerNotFound {
                name: name_b.to_string(),
            }
            .into());
        }
        if key_a == key_b {
            return Err(LadderError::MalformedCommand {
                reason: format!("{name_a} and {name_b} are the same player"),
            }
            .into());
        }

        let Some(absorbed) = self.players.remove(&key_b) else {
            return Err(LadderError::PlayerNotFound {
                name: name_b.to_string(),
            }
            .into());
        };
        self.merge(
            &key_a,
            MergeStats {
                offense: absorbed.offense,
                defense: absorbed.defense,
                played: absorbed.played,
                wins: absorbed.wins,
                rank_o: Some(absorbed.rank_o),
                rank_d: Some(absorbed.rank_d),
                rank_a: Some(absorbed.rank_a),
            },
            table,
        );
        Ok(())
    }

    /// Manual add: a bare name creates a fresh record; a full stat tuple
    /// creates from the tuple, or merges into an existing record the same
    /// way the loader does
    pub fn add(
        &mut self,
        name: &str,
        stats: Option<PlayerStats>,
        rating: &RatingConfig,
        table: &RankTable,
    ) -> crate::error::Result<()> {
        match stats {
            None => {
                if self.contains(name) {
                    return Err(LadderError::DuplicatePlayer {
                        name: name.to_string(),
                    }
                    .into());
                }
                self.ensure(name, rating, table);
                Ok(())
            }
            Some(stats) => {
                self.absorb(
                    LoadedRecord {
                        display: name.to_string(),
                        offense: stats.offense,
                        defense: stats.defense,
                        played: stats.played,
                        wins: wins_from_rate(stats.win_rate, stats.played),
                        avg: None,
                        rank_d: None,
                        rank_o: None,
                        rank_a: None,
                    },
                    rating,
                    table,
                );
                Ok(())
            }
        }
    }

    /// Recompute avg and refresh ranks for every record
    pub fn refresh_all(&mut self, table: &RankTable) {
        for record in self.players.values_mut() {
            rank::refresh_record(record, table);
        }
    }

    /// Records sorted by descending average, ties broken by display name
    pub fn sorted_records(&self) -> Vec<&PlayerRecord> {
        let mut records: Vec<&PlayerRecord> = self.players.values().collect();
        records.sort_by(|a, b| b.avg.cmp(&a.avg).then_with(|| a.display.cmp(&b.display)));
        records
    }

    /// Ordered listing rows, optionally filtered to one tier.
    ///
    /// A player's qualifying tier is the highest-order non-sentinel rank
    /// among the three dimensions; all-sentinel players only appear when the
    /// filter names a sentinel token explicitly.
    pub fn list_players(
        &self,
        filter_tier: Option<&str>,
        table: &RankTable,
    ) -> crate::error::Result<Vec<PlayerRow>> {
        let filter = match filter_tier {
            None => None,
            Some(token) => {
                let token = token.trim().to_lowercase();
                if token == table.hidden_token {
                    Some(Rank::Hidden)
                } else if token == table.special_token {
                    Some(Rank::Special)
                } else if table.is_tier(&token) {
                    Some(Rank::Tier(token))
                } else {
                    return Err(LadderError::MalformedCommand {
                        reason: format!("unknown rank tier: {token}"),
                    }
                    .into());
                }
            }
        };

        let rows = self
            .sorted_records()
            .into_iter()
            .filter(|record| match &filter {
                None => true,
                Some(rank) if rank.is_sentinel() => [
                    &record.rank_o,
                    &record.rank_d,
                    &record.rank_a,
                ]
                .into_iter()
                .any(|r| r == rank),
                Some(rank) => rank::qualifying_tier(record, table) == Some(rank),
            })
            .enumerate()
            .map(|(idx, record)| PlayerRow {
                position: idx + 1,
                display: record.display.clone(),
                avg: record.avg,
                offense: record.offense,
                defense: record.defense,
                played: record.played,
                win_rate: record.win_rate(),
                rank_display: rank::rank_display(record, table),
            })
            .collect();

        Ok(rows)
    }

    /// Leaders across avg, offense, defense, games played, and win rate
    /// (the latter only among players with at least `min_games` games)
    pub fn best_players(&self, min_games: u32) -> BestPlayers {
        let mut best = BestPlayers::default();

        for record in self.sorted_records() {
            let update_max = |slot: &mut Option<(String, i32)>, value: i32| {
                if slot.as_ref().map_or(true, |(_, best)| value > *best) {
                    *slot = Some((record.display.clone(), value));
                }
            };
            update_max(&mut best.best_avg, record.avg);
            update_max(&mut best.best_offense, record.offense);
            update_max(&mut best.best_defense, record.defense);

            if best
                .most_played
                .as_ref()
                .map_or(true, |(_, most)| record.played > *most)
            {
                best.most_played = Some((record.display.clone(), record.played));
            }

            if record.played >= min_games {
                let rate = record.win_rate();
                if best
                    .best_win_rate
                    .as_ref()
                    .map_or(true, |(_, top)| rate > *top)
                {
                    best.best_win_rate = Some((record.display.clone(), rate));
                }
            }
        }

        best
    }

    /// All display names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.players.values().map(|p| p.display.clone()).collect();
        names.sort();
        names
    }

    /// Iterate all records (unordered)
    pub fn records(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    /// Sum of played and wins across all records (conservation checks)
    pub fn totals(&self) -> (u32, u32) {
        self.players
            .values()
            .fold((0, 0), |(p, w), r| (p + r.played, w + r.wins))
    }
}

/// Build a fresh record for a first-seen name
fn new_record(display: &str, key: &str, rating: &RatingConfig, table: &RankTable) -> PlayerRecord {
    let base = rating.rating_min;
    let base_rank = table.classify(base);
    let mut record = PlayerRecord {
        display: display.to_string(),
        offense: base,
        defense: base,
        avg: base,
        played: 0,
        wins: 0,
        rank_o: base_rank.clone(),
        rank_d: base_rank.clone(),
        rank_a: base_rank,
    };
    apply_reserved_override(&mut record, key, table);
    record
}

/// Names carrying the reserved substring are created fully hidden
fn apply_reserved_override(record: &mut PlayerRecord, key: &str, table: &RankTable) {
    if !table.reserved_substring.is_empty() && key.contains(&table.reserved_substring) {
        record.rank_o = Rank::Hidden;
        record.rank_d = Rank::Hidden;
        record.rank_a = Rank::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PlayerStore, RatingConfig, RankTable) {
        (PlayerStore::new(), RatingConfig::default(), RankTable::default())
    }

    #[test]
    fn test_get_or_create_deduplicates_spellings() {
        let (mut store, rating, table) = setup();
        store.get_or_create("Larry Zhong", &rating, &table);
        store.get_or_create("larryzhong!!", &rating, &table);
        assert_eq!(store.len(), 1);

        // First-seen display is preserved verbatim
        assert_eq!(store.get("LARRY ZHONG").unwrap().display, "Larry Zhong");
    }

    #[test]
    fn test_new_record_defaults() {
        let (mut store, rating, table) = setup();
        let record = store.get_or_create("Alice", &rating, &table).clone();
        assert_eq!(record.offense, 100);
        assert_eq!(record.defense, 100);
        assert_eq!(record.avg, 100);
        assert_eq!(record.played, 0);
        assert_eq!(record.wins, 0);
        assert_eq!(record.rank_o, Rank::Tier("iron".to_string()));
    }

    #[test]
    fn test_reserved_substring_creates_hidden() {
        let (mut store, rating, table) = setup();
        let record = store.get_or_create("Larry Zhong", &rating, &table);
        assert_eq!(record.rank_o, Rank::Hidden);
        assert_eq!(record.rank_d, Rank::Hidden);
        assert_eq!(record.rank_a, Rank::Hidden);

        let plain = store.get_or_create("Alice", &rating, &table);
        assert!(!plain.rank_o.is_sentinel());
    }

    #[test]
    fn test_merge_weighted_blend() {
        let (mut store, rating, table) = setup();
        let key = store.ensure("Alice", &rating, &table);
        {
            let rec = store.record_mut(&key).unwrap();
            rec.offense = 300;
            rec.defense = 200;
            rec.played = 3;
            rec.wins = 2;
        }

        store.merge(
            &key,
            MergeStats {
                offense: 600,
                defense: 500,
                played: 1,
                wins: 1,
                rank_o: None,
                rank_d: None,
                rank_a: None,
            },
            &table,
        );

        let rec = store.get("Alice").unwrap();
        // (300*3 + 600*1) / 4 = 375, (200*3 + 500*1) / 4 = 275
        assert_eq!(rec.offense, 375);
        assert_eq!(rec.defense, 275);
        assert_eq!(rec.avg, 325);
        assert_eq!(rec.played, 4);
        assert_eq!(rec.wins, 3);
    }

    #[test]
    fn test_merge_zero_played_takes_incoming() {
        let (mut store, rating, table) = setup();
        let key = store.ensure("Alice", &rating, &table);

        store.merge(
            &key,
            MergeStats {
                offense: 450,
                defense: 250,
                played: 0,
                wins: 0,
                rank_o: None,
                rank_d: None,
                rank_a: None,
            },
            &table,
        );

        let rec = store.get("Alice").unwrap();
        assert_eq!(rec.offense, 450);
        assert_eq!(rec.defense, 250);
    }

    #[test]
    fn test_merge_never_regresses_ranks() {
        let (mut store, rating, table) = setup();
        let key = store.ensure("Alice", &rating, &table);
        {
            let rec = store.record_mut(&key).unwrap();
            rec.rank_o = Rank::Tier("gold".to_string());
        }

        store.merge(
            &key,
            MergeStats {
                offense: 100,
                defense: 100,
                played: 1,
                wins: 0,
                rank_o: Some(Rank::Tier("iron".to_string())),
                rank_d: None,
                rank_a: None,
            },
            &table,
        );

        assert_eq!(
            store.get("Alice").unwrap().rank_o,
            Rank::Tier("gold".to_string())
        );
    }

    #[test]
    fn test_combine_reduces_count_and_preserves_totals() {
        let (mut store, rating, table) = setup();
        let key_a = store.ensure("Alice", &rating, &table);
        let key_b = store.ensure("Bob", &rating, &table);
        {
            let a = store.record_mut(&key_a).unwrap();
            a.played = 4;
            a.wins = 3;
        }
        {
            let b = store.record_mut(&key_b).unwrap();
            b.played = 6;
            b.wins = 1;
        }

        let (played_before, wins_before) = store.totals();
        store.combine("Alice", "Bob", &table).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("Bob").is_none());
        let (played_after, wins_after) = store.totals();
        assert_eq!(played_after, played_before);
        assert_eq!(wins_after, wins_before);
        assert_eq!(store.get("Alice").unwrap().played, 10);
        assert_eq!(store.get("Alice").unwrap().wins, 4);
    }

    #[test]
    fn test_combine_missing_player_rejected_untouched() {
        let (mut store, rating, table) = setup();
        store.ensure("Alice", &rating, &table);
        let before = store.get("Alice").unwrap().clone();

        assert!(store.combine("Alice", "Ghost", &table).is_err());
        assert!(store.combine("Ghost", "Alice", &table).is_err());
        assert!(store.combine("Alice", "alice!!", &table).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Alice").unwrap(), &before);
    }

    #[test]
    fn test_add_bare_name_rejects_duplicate() {
        let (mut store, rating, table) = setup();
        assert!(store.add("Alice", None, &rating, &table).is_ok());
        assert!(store.add("alice", None, &rating, &table).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_with_stats_creates_and_merges() {
        let (mut store, rating, table) = setup();
        let stats = PlayerStats {
            offense: 450,
            defense: 250,
            played: 4,
            win_rate: 50,
        };
        store.add("Alice", Some(stats), &rating, &table).unwrap();
        let rec = store.get("Alice").unwrap();
        assert_eq!(rec.offense, 450);
        assert_eq!(rec.wins, 2);
        assert_eq!(rec.rank_o, Rank::Tier("gold".to_string()));

        // Adding again with stats merges instead of failing
        store.add("alice", Some(stats), &rating, &table).unwrap();
        let rec = store.get("Alice").unwrap();
        assert_eq!(rec.played, 8);
        assert_eq!(rec.offense, 450);
    }

    #[test]
    fn test_list_players_sorted_and_numbered() {
        let (mut store, rating, table) = setup();
        for (name, offense) in [("Cara", 800), ("Abe", 800), ("Bea", 1500)] {
            let key = store.ensure(name, &rating, &table);
            let rec = store.record_mut(&key).unwrap();
            rec.offense = offense;
            rec.defense = offense;
        }
        store.refresh_all(&table);

        let rows = store.list_players(None, &table).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.display.as_str()).collect();
        // Descending avg, ties by display name ascending
        assert_eq!(names, vec!["Bea", "Abe", "Cara"]);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[2].position, 3);
    }

    #[test]
    fn test_list_players_filter_by_tier() {
        let (mut store, rating, table) = setup();
        let key = store.ensure("Alice", &rating, &table);
        {
            let rec = store.record_mut(&key).unwrap();
            rec.offense = 500;
        }
        store.ensure("Bob", &rating, &table);
        store.refresh_all(&table);

        let gold = store.list_players(Some("gold"), &table).unwrap();
        assert_eq!(gold.len(), 1);
        assert_eq!(gold[0].display, "Alice");

        let iron = store.list_players(Some("iron"), &table).unwrap();
        assert_eq!(iron.len(), 1);
        assert_eq!(iron[0].display, "Bob");

        assert!(store.list_players(Some("mythril"), &table).is_err());
    }

    #[test]
    fn test_list_players_hides_all_sentinel_records() {
        let (mut store, rating, table) = setup();
        store.ensure("Larry Zhong", &rating, &table);
        store.ensure("Alice", &rating, &table);
        store.refresh_all(&table);

        // Hidden player never matches a normal tier filter
        let iron = store.list_players(Some("iron"), &table).unwrap();
        assert_eq!(iron.len(), 1);
        assert_eq!(iron[0].display, "Alice");

        // But shows up when the sentinel token is asked for explicitly
        let hidden = store.list_players(Some("lz"), &table).unwrap();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].display, "Larry Zhong");

        // And still appears in the unfiltered listing
        assert_eq!(store.list_players(None, &table).unwrap().len(), 2);
    }

    #[test]
    fn test_best_players() {
        let (mut store, rating, table) = setup();
        for (name, offense, defense, played, wins) in [
            ("Alice", 800, 200, 12, 9),
            ("Bob", 300, 900, 20, 5),
            ("Cara", 600, 600, 3, 3),
        ] {
            let key = store.ensure(name, &rating, &table);
            let rec = store.record_mut(&key).unwrap();
            rec.offense = offense;
            rec.defense = defense;
            rec.played = played;
            rec.wins = wins;
        }
        store.refresh_all(&table);

        let best = store.best_players(10);
        assert_eq!(best.best_offense, Some(("Alice".to_string(), 800)));
        assert_eq!(best.best_defense, Some(("Bob".to_string(), 900)));
        assert_eq!(best.best_avg, Some(("Bob".to_string(), 600)));
        assert_eq!(best.most_played, Some(("Bob".to_string(), 20)));
        // Cara's perfect record is below the games threshold
        assert_eq!(best.best_win_rate, Some(("Alice".to_string(), 75)));
    }

    #[test]
    fn test_best_players_empty_store() {
        let (store, _, _) = setup();
        let best = store.best_players(10);
        assert!(best.best_avg.is_none());
        assert!(best.best_win_rate.is_none());
    }

    #[test]
    fn test_names_sorted() {
        let (mut store, rating, table) = setup();
        store.ensure("Zoe", &rating, &table);
        store.ensure("Alice", &rating, &table);
        assert_eq!(store.names(), vec!["Alice".to_string(), "Zoe".to_string()]);
    }
}
