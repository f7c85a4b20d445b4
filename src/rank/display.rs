//! Render-time rank display
//!
//! Hidden ranks are revealed as a freshly randomized opaque code on every
//! call; the code is never cached on the record, so repeated displays of the
//! same player show different strings.

use crate::config::RankTable;
use crate::types::{PlayerRecord, Rank};
use rand::Rng;

/// Generate a fresh opaque code for a hidden rank
pub fn reveal_hidden() -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(10);
    code.push('L');
    for _ in 0..4 {
        code.push(rng.gen_range(b'a'..=b'z') as char);
    }
    code.push('Z');
    for _ in 0..4 {
        code.push(rng.gen_range(b'a'..=b'z') as char);
    }
    code
}

/// Overall rank string for a record: hidden code if any dimension is hidden,
/// the special label if any is special, otherwise the highest-order tier
pub fn overall_rank(record: &PlayerRecord, table: &RankTable) -> String {
    let ranks = [&record.rank_o, &record.rank_d, &record.rank_a];

    if ranks.iter().any(|r| **r == Rank::Hidden) {
        return reveal_hidden();
    }
    if ranks.iter().any(|r| **r == Rank::Special) {
        return table.special_label.clone();
    }

    ranks
        .into_iter()
        .max_by_key(|r| table.order_of(r))
        .map(|r| table.token_for(r))
        .unwrap_or_else(|| table.lowest_tier().to_string())
}

/// Side indicator: which role's attained rank dominates
pub fn side_indicator(record: &PlayerRecord, table: &RankTable) -> &'static str {
    let order_o = table.order_of(&record.rank_o);
    let order_d = table.order_of(&record.rank_d);
    if order_o > order_d {
        "(o)"
    } else if order_d > order_o {
        "(d)"
    } else {
        "(a)"
    }
}

/// Full display string: overall rank plus side indicator
pub fn rank_display(record: &PlayerRecord, table: &RankTable) -> String {
    format!(
        "{}{}",
        overall_rank(record, table),
        side_indicator(record, table)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_ranks(rank_o: Rank, rank_d: Rank, rank_a: Rank) -> PlayerRecord {
        PlayerRecord {
            display: "Test".to_string(),
            offense: 100,
            defense: 100,
            avg: 100,
            played: 0,
            wins: 0,
            rank_o,
            rank_d,
            rank_a,
        }
    }

    #[test]
    fn test_reveal_hidden_shape() {
        let code = reveal_hidden();
        assert_eq!(code.len(), 10);
        assert!(code.starts_with('L'));
        assert_eq!(code.as_bytes()[5], b'Z');
        assert!(code
            .chars()
            .enumerate()
            .filter(|(i, _)| *i != 0 && *i != 5)
            .all(|(_, c)| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_hidden_reveal_varies() {
        // Ten draws from a 26^8 space: a repeat means the reveal is cached
        let codes: std::collections::HashSet<String> = (0..10).map(|_| reveal_hidden()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_overall_rank_highest_tier() {
        let table = RankTable::default();
        let rec = record_with_ranks(
            Rank::Tier("gold".to_string()),
            Rank::Tier("silver".to_string()),
            Rank::Tier("silver".to_string()),
        );
        assert_eq!(overall_rank(&rec, &table), "gold");
        assert_eq!(side_indicator(&rec, &table), "(o)");
        assert_eq!(rank_display(&rec, &table), "gold(o)");
    }

    #[test]
    fn test_overall_rank_hidden_takes_precedence() {
        let table = RankTable::default();
        let rec = record_with_ranks(
            Rank::Hidden,
            Rank::Special,
            Rank::Tier("gold".to_string()),
        );
        let shown = overall_rank(&rec, &table);
        assert_ne!(shown, table.special_label);
        assert!(shown.starts_with('L'));
    }

    #[test]
    fn test_overall_rank_special_label() {
        let table = RankTable::default();
        let rec = record_with_ranks(
            Rank::Special,
            Rank::Tier("iron".to_string()),
            Rank::Tier("iron".to_string()),
        );
        assert_eq!(overall_rank(&rec, &table), "importal");
    }

    #[test]
    fn test_side_indicator_defense_and_tie() {
        let table = RankTable::default();
        let defense_heavy = record_with_ranks(
            Rank::Tier("iron".to_string()),
            Rank::Tier("gold".to_string()),
            Rank::Tier("silver".to_string()),
        );
        assert_eq!(side_indicator(&defense_heavy, &table), "(d)");

        let tied = record_with_ranks(
            Rank::Tier("gold".to_string()),
            Rank::Tier("gold".to_string()),
            Rank::Tier("gold".to_string()),
        );
        assert_eq!(side_indicator(&tied, &table), "(a)");
    }
}
