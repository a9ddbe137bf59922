//! Audit log handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use leadbook_core::models::AuthUser;
use leadbook_core::AuditEntry;

/// Largest number of audit entries returned in one call
pub const MAX_AUDIT_LIMIT: i64 = 100;

/// Query parameters for audit log
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_audit_limit")]
    pub limit: i64,
}

fn default_audit_limit() -> i64 {
    MAX_AUDIT_LIMIT
}

/// GET /api/audit - Recent audit entries for the caller's organization
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let limit = params.limit.clamp(1, MAX_AUDIT_LIMIT);

    let entries = state.db.list_audit_log(auth.organization_id, limit)?;

    Ok(Json(entries))
}
