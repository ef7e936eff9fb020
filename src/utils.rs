//! Utility functions for the autoblog service
//!
//! - `utils::slug` for slug derivation and title normalization
//! - `utils::time` for schedule timezones and interval parsing

pub mod slug;
pub mod time;

pub use slug::{derive_slug, slugify, truncate_title};
