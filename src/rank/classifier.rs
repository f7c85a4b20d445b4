//! Monotonic rank classification
//!
//! Ranks only ever move up: a freshly classified tier replaces the stored
//! one only when it outranks it, and sentinel ranks are frozen entirely.

use crate::config::RankTable;
use crate::types::{PlayerRecord, Rank};

/// Raise `current` to `candidate` if the candidate outranks it.
/// Sentinels are never touched.
fn raise(current: &mut Rank, candidate: Rank, table: &RankTable) {
    if current.is_sentinel() {
        return;
    }
    if table.order_of(&candidate) > table.order_of(current) {
        *current = candidate;
    }
}

/// Recompute the derived average and refresh all three rank dimensions
/// from the current scores
pub fn refresh_record(record: &mut PlayerRecord, table: &RankTable) {
    record.recompute_avg();

    let new_o = table.classify(record.offense);
    let new_d = table.classify(record.defense);
    let new_a = table.classify(record.avg);

    raise(&mut record.rank_o, new_o, table);
    raise(&mut record.rank_d, new_d, table);
    raise(&mut record.rank_a, new_a, table);
}

/// Pick whichever of two ranks outranks the other, favoring `old` on ties.
/// Used by the merge path so a blended record never regresses a dimension.
pub fn max_rank(old: Rank, incoming: Rank, table: &RankTable) -> Rank {
    if table.order_of(&incoming) > table.order_of(&old) {
        incoming
    } else {
        old
    }
}

/// Highest-order non-sentinel rank among the three dimensions,
/// `None` when every dimension is a sentinel
pub fn qualifying_tier<'a>(record: &'a PlayerRecord, table: &RankTable) -> Option<&'a Rank> {
    [&record.rank_o, &record.rank_d, &record.rank_a]
        .into_iter()
        .filter(|r| !r.is_sentinel())
        .max_by_key(|r| table.order_of(r))
}
