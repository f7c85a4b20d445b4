//! Rank classification and display
//!
//! Maps numeric scores to named tiers under the configured threshold table,
//! maintains the "never decreases" invariant per player, and renders the
//! overall rank (including the randomized hidden reveal) at display time.

pub mod classifier;
pub mod display;

// Re-export commonly used functions
pub use classifier::{max_rank, qualifying_tier, refresh_record};
pub use display::{overall_rank, rank_display, reveal_hidden, side_indicator};
