//! Insight Engine - dashboard analytics for an organization's leads
//!
//! Given one organization's leads, the engine computes headline stats, a
//! pipeline funnel, and a short list of actionable insight cards. Everything
//! is derived on demand from the leads and an injected `now`; nothing here
//! touches the database.
//!
//! ## Built-in Rules
//!
//! - **Hot Prospects** - recent QUALIFIED leads with a hot calculated score
//! - **Stale Leads** - NEW leads older than a week
//! - **High-Value Leads** - leads worth $5k or more
//! - **Conversion Gap** - under half of the leads are linked to a contact
//! - **Inactive Leads** - CONTACTED leads older than a week
//!
//! ## Usage
//!
//! ```rust,ignore
//! use leadbook_core::insights::InsightEngine;
//!
//! let leads = db.list_all_leads(org_id)?;
//! let contacts = db.count_contacts(org_id)?;
//! let dashboard = InsightEngine::new().derive(&leads, contacts, Utc::now());
//! ```

pub mod engine;
pub mod rules;
pub mod types;

pub use engine::{
    compute_funnel, compute_stats, derive_insights, AnalysisContext, InsightEngine, InsightRule,
    RECENT_WINDOW_DAYS,
};
pub use rules::{
    ActivityNeededRule, ConversionOpportunityRule, HighValueRule, HotProspectsRule,
    StaleLeadsRule,
};
pub use types::{DashboardAnalytics, Funnel, Insight, InsightColor, InsightKind, LeadStats};
