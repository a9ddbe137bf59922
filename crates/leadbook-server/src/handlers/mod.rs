//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod account;
pub mod analytics;
pub mod audit;
pub mod auth;
pub mod contacts;
pub mod leads;

// Re-export all handlers for use in router
pub use account::*;
pub use analytics::*;
pub use audit::*;
pub use auth::*;
pub use contacts::*;
pub use leads::*;
