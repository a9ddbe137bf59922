//! Dashboard analytics and lead scoring handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::{AppError, AppState};
use leadbook_core::models::{AuthUser, Contact};
use leadbook_core::{derive_insights, DashboardAnalytics, ScoreSummary, ScoredLead};

/// A scored lead with its contact
#[derive(Serialize)]
pub struct LeadScore {
    #[serde(flatten)]
    pub scored: ScoredLead,
    pub contact: Option<Contact>,
}

/// Scored leads plus their health distribution
#[derive(Serialize)]
pub struct LeadScoresResponse {
    pub leads: Vec<LeadScore>,
    pub summary: ScoreSummary,
}

/// GET /api/analytics/dashboard - Stats, funnel, and insight cards
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DashboardAnalytics>, AppError> {
    let now = Utc::now();
    let leads = state.db.list_all_leads(auth.organization_id)?;
    let total_contacts = state.db.count_contacts(auth.organization_id)?;

    let analytics = derive_insights(&leads, total_contacts, now);
    debug!(
        organization = auth.organization_id,
        leads = analytics.stats.total_leads,
        insights = analytics.insights.len(),
        "Computed dashboard"
    );

    Ok(Json(analytics))
}

/// GET /api/analytics/lead-scores - Every lead with its calculated score, newest first
pub async fn get_lead_scores(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<LeadScoresResponse>, AppError> {
    let now = Utc::now();
    let details = state.db.list_all_lead_details(auth.organization_id)?;

    let (scored, contacts): (Vec<ScoredLead>, Vec<Option<Contact>>) = details
        .into_iter()
        .map(|detail| (ScoredLead::new(detail.lead, now), detail.contact))
        .unzip();
    let summary = ScoreSummary::from_scored(&scored);

    let leads = scored
        .into_iter()
        .zip(contacts)
        .map(|(scored, contact)| LeadScore { scored, contact })
        .collect();

    Ok(Json(LeadScoresResponse { leads, summary }))
}
