//! Free-text match parsing and rating application
//!
//! A match line has the shape `<team1> <wintype> <team2>` with team1 always
//! the winning side. Within a team, a `;` separates the offense roster from
//! the defense roster; without one the whole list plays offense.

use crate::config::{RankTable, RatingConfig};
use crate::error::LadderError;
use crate::rating;
use crate::store::PlayerStore;
use crate::types::{MatchReport, Outcome, PlayerKey, RatingLine, Role};
use crate::utils::mean_rating;
use tracing::debug;

/// One side of a match, split into role rosters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Team {
    pub offense: Vec<String>,
    pub defense: Vec<String>,
}

impl Team {
    pub fn is_empty(&self) -> bool {
        self.offense.is_empty() && self.defense.is_empty()
    }
}

/// A match line after parsing, before any rating math
#[derive(Debug, Clone)]
pub struct ParsedMatch {
    pub winners: Team,
    pub losers: Team,
    pub win_type: String,
    pub multiplier: f64,
}

/// Split a team description into offense and defense rosters
pub fn parse_team(text: &str) -> Team {
    let split_names = |part: &str| -> Vec<String> {
        part.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    };

    match text.split_once(';') {
        Some((offense_part, defense_part)) => Team {
            offense: split_names(offense_part),
            defense: split_names(defense_part),
        },
        None => Team {
            offense: split_names(text),
            defense: Vec::new(),
        },
    }
}

/// Parse a raw match line into teams and a win type.
///
/// Rejected (store untouched) when no win-type keyword is present or no
/// participant is named on either side.
pub fn parse_match(raw: &str, config: &RatingConfig) -> crate::error::Result<ParsedMatch> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    let split_at = tokens
        .iter()
        .position(|token| config.is_win_type(token))
        .ok_or_else(|| LadderError::MalformedMatch {
            reason: "no win type keyword found (expected e.g. `team1 win team2`)".to_string(),
        })?;

    let win_type = tokens[split_at].to_lowercase();
    let multiplier = config
        .multiplier_for(&win_type)
        .ok_or_else(|| LadderError::UnknownWinType {
            token: win_type.clone(),
        })?;

    let winners = parse_team(&tokens[..split_at].join(" "));
    let losers = parse_team(&tokens[split_at + 1..].join(" "));

    if winners.is_empty() && losers.is_empty() {
        return Err(LadderError::MalformedMatch {
            reason: "no participants named".to_string(),
        }
        .into());
    }

    Ok(ParsedMatch {
        winners,
        losers,
        win_type,
        multiplier,
    })
}

/// Process one match line against the store: resolve every participant,
/// aggregate opponent ratings from a pre-update snapshot, apply the rating
/// update per role, then refresh every record's avg and ranks.
pub fn process_match(
    store: &mut PlayerStore,
    raw: &str,
    config: &RatingConfig,
    table: &RankTable,
) -> crate::error::Result<MatchReport> {
    let parsed = parse_match(raw, config)?;

    // Every participant exists before any rating math runs
    let resolve = |store: &mut PlayerStore, names: &[String]| -> Vec<PlayerKey> {
        names
            .iter()
            .map(|name| store.ensure(name, config, table))
            .collect()
    };
    let winner_offense = resolve(store, &parsed.winners.offense);
    let winner_defense = resolve(store, &parsed.winners.defense);
    let loser_offense = resolve(store, &parsed.losers.offense);
    let loser_defense = resolve(store, &parsed.losers.defense);

    // Snapshot of the pre-match ratings per roster; aggregates must not be
    // invalidated by the updates below
    let ratings_of = |store: &PlayerStore, keys: &[PlayerKey], role: Role| -> Vec<i32> {
        keys.iter()
            .filter_map(|key| store.get_by_key(key))
            .map(|rec| match role {
                Role::Offense => rec.offense,
                Role::Defense => rec.defense,
            })
            .collect()
    };
    let w_off = ratings_of(store, &winner_offense, Role::Offense);
    let w_def = ratings_of(store, &winner_defense, Role::Defense);
    let l_off = ratings_of(store, &loser_offense, Role::Offense);
    let l_def = ratings_of(store, &loser_defense, Role::Defense);

    // Offense is answered by the opposing defense and vice versa, falling
    // back to the other roster, then to the neutral constant
    let neutral = config.neutral_opponent_rating as f64;
    let opponent_for = |primary: &[i32], secondary: &[i32]| -> f64 {
        mean_rating(primary)
            .or_else(|| mean_rating(secondary))
            .unwrap_or(neutral)
    };
    let winner_offense_opp = opponent_for(&l_def, &l_off);
    let winner_defense_opp = opponent_for(&l_off, &l_def);
    let loser_offense_opp = opponent_for(&w_def, &w_off);
    let loser_defense_opp = opponent_for(&w_off, &w_def);

    let mut lines = Vec::new();
    let rosters: [(&[PlayerKey], Role, f64, Outcome); 4] = [
        (
            winner_offense.as_slice(),
            Role::Offense,
            winner_offense_opp,
            Outcome::Win,
        ),
        (
            winner_defense.as_slice(),
            Role::Defense,
            winner_defense_opp,
            Outcome::Win,
        ),
        (
            loser_offense.as_slice(),
            Role::Offense,
            loser_offense_opp,
            Outcome::Loss,
        ),
        (
            loser_defense.as_slice(),
            Role::Defense,
            loser_defense_opp,
            Outcome::Loss,
        ),
    ];

    for (keys, role, opponent, outcome) in rosters {
        for key in keys {
            let Some(record) = store.record_mut(key) else {
                continue;
            };
            let current = match role {
                Role::Offense => record.offense,
                Role::Defense => record.defense,
            };
            let (new_rating, delta) =
                rating::update(current, outcome, opponent, parsed.multiplier, config);

            match role {
                Role::Offense => record.offense = new_rating,
                Role::Defense => record.defense = new_rating,
            }
            record.played += 1;
            if outcome == Outcome::Win {
                record.wins += 1;
            }

            debug!(
                "{} {} {:?}: {} -> {} ({:+})",
                record.display, role, outcome, current, new_rating, delta
            );
            lines.push(RatingLine {
                display: record.display.clone(),
                role,
                outcome,
                old_rating: current,
                new_rating,
                delta,
            });
        }
    }

    store.refresh_all(table);

    Ok(MatchReport {
        win_type: parsed.win_type,
        multiplier: parsed.multiplier,
        lines,
    })
}
