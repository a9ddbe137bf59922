//! Account (profile) handlers for the authenticated user

use std::sync::Arc;

use axum::{body::Body, extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{read_json, AppError, AppState, MessageResponse};
use leadbook_core::models::{AccountUpdate, AuthUser, Organization, User};

/// Profile with its organization
#[derive(Serialize)]
pub struct AccountResponse {
    pub user: User,
    pub organization: Option<Organization>,
}

/// Response for a profile update
#[derive(Serialize)]
pub struct AccountUpdateResponse {
    pub message: String,
    pub user: User,
}

/// Request body for deleting the account
#[derive(Debug, Default, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// GET /api/account - Current user's profile
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AccountResponse>, AppError> {
    let user = state
        .db
        .get_user(auth.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let organization = state.db.get_organization(user.organization_id)?;

    Ok(Json(AccountResponse { user, organization }))
}

/// PUT /api/account - Rename and/or change password
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    body: Body,
) -> Result<Json<AccountUpdateResponse>, AppError> {
    let update: AccountUpdate = read_json(body).await?;
    let password_changed = update.new_password.is_some();

    let user = state.db.update_account(auth.user_id, &update)?;

    state.db.log_audit(
        auth.organization_id,
        &auth.email,
        "update",
        Some("user"),
        Some(auth.user_id),
        Some(&format!("password_changed={}", password_changed)),
    )?;

    Ok(Json(AccountUpdateResponse {
        message: "Account updated successfully".to_string(),
        user,
    }))
}

/// DELETE /api/account - Delete the current user (password required)
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    body: Body,
) -> Result<Json<MessageResponse>, AppError> {
    let req: DeleteAccountRequest = read_json(body).await?;
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request("Password required to delete account"))?;

    state.db.delete_user(auth.user_id, &password)?;
    info!(user = %auth.email, "Deleted account");

    // The organization outlives the user, so the entry stays visible to teammates
    state.db.log_audit(
        auth.organization_id,
        &auth.email,
        "delete",
        Some("user"),
        Some(auth.user_id),
        None,
    )?;

    Ok(MessageResponse::new("Account deleted successfully"))
}
