//! Configuration management for the foos-ladder engine
//!
//! This module handles all configuration loading from environment variables
//! and TOML files, validation, and the default reference tables.

pub mod app;
pub mod ranks;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, StoreSettings};
pub use ranks::{RankTable, RankTier};
pub use rating::{ProtectionBand, RatingConfig, WinTypeMultiplier};
