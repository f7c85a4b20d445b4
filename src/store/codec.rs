//! Line-oriented persistence for the player store
//!
//! One record per line, comma-separated with a trailing period:
//!
//! ```text
//! DisplayName, offense, defense, played, win_rate, avg, rank_d, rank_o, rank_a.
//! ```
//!
//! The trailing fields are optional so older file layouts still load; the
//! loader re-derives whatever a line does not carry. Corrupt lines are
//! skipped individually rather than failing the whole file.

use crate::config::{RankTable, RatingConfig};
use crate::store::players::{LoadedRecord, PlayerStore};
use crate::types::PlayerRecord;
use crate::utils::wins_from_rate;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Minimum fields a line must carry: display, offense, defense, played,
/// win rate
const MIN_FIELDS: usize = 5;

/// Parse one store line. `None` means the line is unusable and should be
/// skipped (too few fields, or a non-numeric required field).
pub fn parse_line(line: &str, table: &RankTable) -> Option<LoadedRecord> {
    let line = line.trim().trim_end_matches('.');
    if line.is_empty() {
        return None;
    }

    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < MIN_FIELDS {
        return None;
    }

    let display = parts[0];
    if display.is_empty() {
        return None;
    }
    let offense = parts[1].parse::<i32>().ok()?;
    let defense = parts[2].parse::<i32>().ok()?;
    let played = parts[3].parse::<u32>().ok()?;
    let win_rate = parts[4].parse::<u32>().ok()?;

    Some(LoadedRecord {
        display: display.to_string(),
        offense,
        defense,
        played,
        wins: wins_from_rate(win_rate, played),
        avg: parts.get(5).and_then(|s| s.parse::<i32>().ok()),
        rank_d: parts.get(6).and_then(|s| table.parse_token(s)),
        rank_o: parts.get(7).and_then(|s| table.parse_token(s)),
        rank_a: parts.get(8).and_then(|s| table.parse_token(s)),
    })
}

/// Encode one record in the full current layout
pub fn encode_line(record: &PlayerRecord, table: &RankTable) -> String {
    format!(
        "{}, {}, {}, {}, {}, {}, {}, {}, {}.",
        record.display,
        record.offense,
        record.defense,
        record.played,
        record.win_rate(),
        record.avg,
        table.token_for(&record.rank_d),
        table.token_for(&record.rank_o),
        table.token_for(&record.rank_a),
    )
}

/// Load the player store from `path`. A missing file yields an empty store;
/// corrupt lines are skipped with a warning and duplicate canonical keys
/// merge into one record.
pub fn load(path: &Path, rating: &RatingConfig, table: &RankTable) -> crate::error::Result<PlayerStore> {
    let mut store = PlayerStore::new();

    if !path.exists() {
        info!("Store file {} not found, starting empty", path.display());
        return Ok(store);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read store file {}", path.display()))?;

    let mut skipped = 0usize;
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, table) {
            Some(loaded) => store.absorb(loaded, rating, table),
            None => {
                skipped += 1;
                warn!("Skipping corrupt store line {}: {}", idx + 1, line.trim());
            }
        }
    }

    info!(
        "Loaded {} players from {} ({} corrupt lines skipped)",
        store.len(),
        path.display(),
        skipped
    );
    Ok(store)
}

/// Write the store to `path`: records sorted by descending average (ties by
/// display name), written to a temporary sibling and atomically renamed so
/// a concurrent reader never sees a truncated file.
pub fn save(path: &Path, store: &PlayerStore, table: &RankTable) -> crate::error::Result<()> {
    let mut out = String::new();
    for record in store.sorted_records() {
        out.push_str(&encode_line(record, table));
        out.push('\n');
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, out)
        .with_context(|| format!("Failed to write temporary store file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace store file {}", path.display()))?;

    info!("Saved {} players to {}", store.len(), path.display());
    Ok(())
}

/// Temporary sibling path in the same directory, so the final rename stays
/// on one filesystem
fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}
