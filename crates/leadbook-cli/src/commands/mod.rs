//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, seed) and shared utilities (open_db, require_organization)
//! - `analytics` - Lead scores and dashboard insights
//! - `export` - CSV export of scored leads
//! - `serve` - Web server command

pub mod analytics;
pub mod core;
pub mod export;
pub mod serve;

// Re-export command functions for main.rs
pub use analytics::*;
pub use core::*;
pub use export::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
