//! Leadbook Core Library
//!
//! Shared functionality for the Leadbook CRM:
//! - Domain models and input validation
//! - Lead scoring (calculated score, health, label)
//! - Insight engine for dashboard analytics
//! - Database access and migrations
//! - Password hashing and session tokens
//! - CSV export of scored leads

pub mod auth;
pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod lead_set;
pub mod models;
pub mod scoring;
pub mod validate;

pub use db::{AuditEntry, Database};
pub use error::{Error, FieldErrors, Result};
pub use export::write_scored_leads_csv;
pub use insights::{derive_insights, DashboardAnalytics, Insight, InsightEngine, InsightKind};
pub use lead_set::LeadSet;
pub use scoring::{
    classify_health, classify_label, compute_score, score_leads, sort_newest_first, ScoreHealth,
    ScoreLabel, ScoreSummary, ScoredLead,
};
