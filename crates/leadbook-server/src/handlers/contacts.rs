//! Contact handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{read_json, AppError, AppState, MessageResponse};
use leadbook_core::models::{AuthUser, Contact, ContactFilter, ContactInput, PageRequest};

/// Query parameters for contact listing
#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Search name, email, and company
    pub q: Option<String>,
}

/// Paginated contact list
#[derive(Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<Contact>,
    pub total: i64,
    pub page: u32,
    pub pages: u32,
}

/// GET /api/contacts - List contacts with search and pagination
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ContactListQuery>,
) -> Result<Json<ContactListResponse>, AppError> {
    let filter = ContactFilter {
        query: params.q,
        page: PageRequest::new(params.page, params.limit),
    };

    let page = state.db.list_contacts(auth.organization_id, &filter)?;

    Ok(Json(ContactListResponse {
        contacts: page.items,
        total: page.total,
        page: page.page,
        pages: page.pages,
    }))
}

/// POST /api/contacts - Create a contact owned by the caller
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    body: Body,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let input: ContactInput = read_json(body).await?;

    let contact = state
        .db
        .create_contact(auth.organization_id, Some(auth.user_id), &input)?;

    state.db.log_audit(
        auth.organization_id,
        &auth.email,
        "create",
        Some("contact"),
        Some(contact.id),
        Some(&format!("email={}", contact.email)),
    )?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /api/contacts/:id - Get a single contact
pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, AppError> {
    let contact = state
        .db
        .get_contact(auth.organization_id, id)?
        .ok_or_else(|| AppError::not_found("Contact not found"))?;

    Ok(Json(contact))
}

/// PUT /api/contacts/:id - Replace a contact's fields
pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Body,
) -> Result<Json<Contact>, AppError> {
    let input: ContactInput = read_json(body).await?;

    let contact = state.db.update_contact(auth.organization_id, id, &input)?;

    state.db.log_audit(
        auth.organization_id,
        &auth.email,
        "update",
        Some("contact"),
        Some(id),
        None,
    )?;

    Ok(Json(contact))
}

/// DELETE /api/contacts/:id - Delete a contact, unlinking its leads
pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.db.delete_contact(auth.organization_id, id)?;

    state.db.log_audit(
        auth.organization_id,
        &auth.email,
        "delete",
        Some("contact"),
        Some(id),
        None,
    )?;

    Ok(MessageResponse::new("Contact deleted successfully"))
}
