//! Authentication-related handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::{read_json, AppError, AppState, MessageResponse, SessionToken};
use leadbook_core::models::{AuthUser, LoginInput, RegisterInput, Session, User};

/// Response for a successful registration
#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

/// POST /api/auth/register - Create a user and their organization
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Body,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let input: RegisterInput = read_json(body).await?;

    let user = state.db.register_user(&input)?;

    state.db.log_audit(
        user.organization_id,
        &user.email,
        "register",
        Some("user"),
        Some(user.id),
        None,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// POST /api/auth/login - Exchange credentials for a bearer session
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Body,
) -> Result<Json<Session>, AppError> {
    let input: LoginInput = read_json(body).await?;

    let session = state
        .db
        .login(&input, state.config.session_ttl_hours, Utc::now())?;

    state.db.log_audit(
        session.user.organization_id,
        &session.user.email,
        "login",
        Some("session"),
        None,
        Some(&format!("expires_at={}", session.expires_at.to_rfc3339())),
    )?;

    Ok(Json(session))
}

/// POST /api/auth/logout - Revoke the presented session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<Json<MessageResponse>, AppError> {
    state.db.revoke_session(&token)?;

    state.db.log_audit(
        user.organization_id,
        &user.email,
        "logout",
        Some("session"),
        None,
        None,
    )?;

    Ok(MessageResponse::new("Logged out successfully"))
}

/// GET /api/me - The authenticated caller
pub async fn get_me(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}
