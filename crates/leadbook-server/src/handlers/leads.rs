//! Lead handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{read_json, AppError, AppState, MessageResponse};
use leadbook_core::models::{
    AuthUser, LeadDetail, LeadFilter, LeadStatus, LeadUpdate, NewLead, PageRequest,
};

/// Query parameters for lead listing
#[derive(Debug, Default, Deserialize)]
pub struct LeadListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    /// Search the linked contact's name and email
    pub q: Option<String>,
}

/// Paginated lead list
#[derive(Serialize)]
pub struct LeadListResponse {
    pub leads: Vec<LeadDetail>,
    pub total: i64,
    pub page: u32,
    pub pages: u32,
}

/// GET /api/leads - List leads with status filter, search, and pagination
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<LeadListQuery>,
) -> Result<Json<LeadListResponse>, AppError> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<LeadStatus>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let filter = LeadFilter {
        status,
        query: params.q,
        page: PageRequest::new(params.page, params.limit),
    };

    let page = state.db.list_leads(auth.organization_id, &filter)?;

    Ok(Json(LeadListResponse {
        leads: page.items,
        total: page.total,
        page: page.page,
        pages: page.pages,
    }))
}

/// POST /api/leads - Create a lead for one of the organization's contacts
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    body: Body,
) -> Result<(StatusCode, Json<LeadDetail>), AppError> {
    let input: NewLead = read_json(body).await?;

    let lead = state
        .db
        .create_lead(auth.organization_id, &input, Utc::now())?;

    state.db.log_audit(
        auth.organization_id,
        &auth.email,
        "create",
        Some("lead"),
        Some(lead.lead.id),
        Some(&format!(
            "status={}, source={}, value={:.2}",
            input.status, input.source, input.value
        )),
    )?;

    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /api/leads/:id - Get a single lead with its contact
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<LeadDetail>, AppError> {
    let lead = state
        .db
        .get_lead(auth.organization_id, id)?
        .ok_or_else(|| AppError::not_found("Lead not found"))?;

    Ok(Json(lead))
}

/// PUT /api/leads/:id - Partially update a lead
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Body,
) -> Result<Json<LeadDetail>, AppError> {
    let update: LeadUpdate = read_json(body).await?;
    if update.is_empty() {
        return Err(AppError::bad_request("No fields to update"));
    }

    let lead = state
        .db
        .update_lead(auth.organization_id, id, &update, Utc::now())?;

    let details = update
        .status
        .map(|status| format!("status={}", status));
    state.db.log_audit(
        auth.organization_id,
        &auth.email,
        "update",
        Some("lead"),
        Some(id),
        details.as_deref(),
    )?;

    Ok(Json(lead))
}

/// DELETE /api/leads/:id - Delete a lead
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.db.delete_lead(auth.organization_id, id)?;

    state.db.log_audit(
        auth.organization_id,
        &auth.email,
        "delete",
        Some("lead"),
        Some(id),
        None,
    )?;

    Ok(MessageResponse::new("Lead deleted successfully"))
}
