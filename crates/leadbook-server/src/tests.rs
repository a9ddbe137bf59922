//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use leadbook_core::db::Database;
use serde_json::{json, Value};
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    create_router(db, None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a request, optionally authenticated and with a JSON body
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, get_body_json(response).await)
}

async fn register(app: &Router, email: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Test User",
            "email": email,
            "password": "password123",
            "confirmPassword": "password123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

async fn login(app: &Router, email: &str) -> String {
    let (status, json) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_string()
}

async fn register_and_login(app: &Router, email: &str) -> String {
    register(app, email).await;
    login(app, email).await
}

async fn create_contact(app: &Router, token: &str, email: &str) -> i64 {
    let (status, json) = send(
        app,
        "POST",
        "/api/contacts",
        Some(token),
        Some(json!({ "firstName": "Ann", "lastName": "Lee", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_i64().unwrap()
}

// ========== Authentication ==========

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_test_app();
    let (status, json) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = setup_test_app();

    for uri in [
        "/api/me",
        "/api/contacts",
        "/api/leads",
        "/api/analytics/dashboard",
        "/api/analytics/lead-scores",
        "/api/audit",
    ] {
        let (status, json) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(json["error"], "Authentication required");
    }

    let (status, _) = send(&app, "GET", "/api/me", Some("not-a-real-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_returns_user() {
    let app = setup_test_app();
    let json = register(&app, "Owner@Example.com").await;

    assert_eq!(json["message"], "User registered successfully");
    assert_eq!(json["user"]["email"], "owner@example.com");
    assert_eq!(json["user"]["role"], "USER");
    assert!(json["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = setup_test_app();
    register(&app, "owner@example.com").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Someone Else",
            "email": "OWNER@example.com",
            "password": "password123",
            "confirmPassword": "password123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "User with this email already exists");
}

#[tokio::test]
async fn test_register_validation_details() {
    let app = setup_test_app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "A",
            "email": "not-an-email",
            "password": "short",
            "confirmPassword": "different"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid input");
    assert!(json["details"]["name"].is_array());
    assert!(json["details"]["email"].is_array());
    assert!(json["details"]["password"].is_array());
    assert!(json["details"]["confirmPassword"].is_array());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = setup_test_app();
    register(&app, "owner@example.com").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "owner@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_invalid_json_body() {
    let app = setup_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Invalid JSON");
}

#[tokio::test]
async fn test_me_and_logout() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;

    let (status, me) = send(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "owner@example.com");
    assert!(me["organizationId"].as_i64().is_some());

    let (status, json) = send(&app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Logged out successfully");

    // Revoked token no longer works
    let (status, _) = send(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("content-security-policy"));
}

// ========== Account ==========

#[tokio::test]
async fn test_account_profile_and_password_change() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;

    let (status, json) = send(&app, "GET", "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["organization"]["name"], "Test User's Organization");

    let (status, json) = send(
        &app,
        "PUT",
        "/api/account",
        Some(&token),
        Some(json!({ "currentPassword": "wrong-password", "newPassword": "newpassword1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"]["currentPassword"][0], "Current password is incorrect");

    let (status, json) = send(
        &app,
        "PUT",
        "/api/account",
        Some(&token),
        Some(json!({
            "name": "Renamed",
            "currentPassword": "password123",
            "newPassword": "newpassword1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Account updated successfully");
    assert_eq!(json["user"]["name"], "Renamed");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "owner@example.com", "password": "newpassword1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_account_requires_password() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;

    let (status, json) = send(&app, "DELETE", "/api/account", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Password required to delete account");

    let (status, json) = send(
        &app,
        "DELETE",
        "/api/account",
        Some(&token),
        Some(json!({ "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Password is incorrect");

    let (status, json) = send(
        &app,
        "DELETE",
        "/api/account",
        Some(&token),
        Some(json!({ "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Account deleted successfully");

    // Sessions die with the user
    let (status, _) = send(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ========== Contacts & Leads ==========

#[tokio::test]
async fn test_contact_crud_and_search() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;
    let ann = create_contact(&app, &token, "ann@example.com").await;
    create_contact(&app, &token, "bob@example.com").await;

    let (status, json) = send(&app, "GET", "/api/contacts?q=ann", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["contacts"][0]["id"], ann);

    let (status, json) = send(&app, "GET", "/api/contacts?limit=1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["pages"], 2);
    assert_eq!(json["contacts"].as_array().unwrap().len(), 1);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/contacts/{}", ann),
        Some(&token),
        Some(json!({
            "firstName": "Ann",
            "lastName": "Lee",
            "email": "ann@example.com",
            "company": "Acme"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["company"], "Acme");

    let (status, json) =
        send(&app, "DELETE", &format!("/api/contacts/{}", ann), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Contact deleted successfully");

    let (status, _) =
        send(&app, "GET", &format!("/api/contacts/{}", ann), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_validation() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/contacts",
        Some(&token),
        Some(json!({ "firstName": "Ann" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid input");
    assert!(json["details"]["lastName"].is_array());
    assert!(json["details"]["email"].is_array());
}

#[tokio::test]
async fn test_lead_crud() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;
    let ann = create_contact(&app, &token, "ann@example.com").await;

    let (status, lead) = send(
        &app,
        "POST",
        "/api/leads",
        Some(&token),
        Some(json!({
            "contactId": ann,
            "source": "WEBSITE",
            "status": "NEW",
            "value": 2500,
            "tags": ["inbound"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(lead["contact"]["email"], "ann@example.com");
    let id = lead["id"].as_i64().unwrap();

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/leads/{}", id),
        Some(&token),
        Some(json!({ "status": "CONTACTED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "CONTACTED");
    assert_eq!(json["value"], 2500.0);

    let (status, json) =
        send(&app, "GET", "/api/leads?status=CONTACTED", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);

    let (status, json) = send(&app, "GET", "/api/leads?status=NEW", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);

    let (status, _) = send(&app, "GET", "/api/leads?status=BOGUS", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/leads/{}", id),
        Some(&token),
        Some(json!({ "score": 150 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["details"]["score"].is_array());

    let (status, _) =
        send(&app, "DELETE", &format!("/api/leads/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/leads/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_organizations_are_isolated() {
    let app = setup_test_app();
    let owner = register_and_login(&app, "owner@example.com").await;
    let other = register_and_login(&app, "other@example.com").await;
    let ann = create_contact(&app, &owner, "ann@example.com").await;

    // Another organization cannot see, edit, or attach leads to the contact
    let (status, _) = send(&app, "GET", &format!("/api/contacts/{}", ann), Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/contacts/{}", ann),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        &app,
        "POST",
        "/api/leads",
        Some(&other),
        Some(json!({ "contactId": ann, "source": "EMAIL", "status": "NEW" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Contact not found or access denied");

    let (_, json) = send(&app, "GET", "/api/contacts", Some(&other), None).await;
    assert_eq!(json["total"], 0);

    let (_, json) = send(&app, "GET", "/api/audit", Some(&other), None).await;
    assert!(json
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["userEmail"] == "other@example.com"));
}

// ========== Analytics ==========

#[tokio::test]
async fn test_dashboard_end_to_end() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;

    let (status, json) = send(&app, "GET", "/api/analytics/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"]["totalLeads"], 0);
    assert_eq!(json["stats"]["conversionRate"], 0);
    assert_eq!(json["insights"], json!([]));

    let ann = create_contact(&app, &token, "ann@example.com").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/leads",
        Some(&token),
        Some(json!({
            "contactId": ann,
            "source": "REFERRAL",
            "status": "QUALIFIED",
            "value": 12000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(&app, "GET", "/api/analytics/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"]["totalLeads"], 1);
    assert_eq!(json["stats"]["totalContacts"], 1);
    assert_eq!(json["stats"]["totalValue"], 12000.0);
    assert_eq!(json["stats"]["conversionRate"], 100);
    assert_eq!(json["funnel"]["qualified"], 1);

    let insights = json["insights"].as_array().unwrap();
    assert_eq!(insights[0]["type"], "hot-prospects");
    assert_eq!(insights[0]["count"], 1);
    assert_eq!(insights[1]["type"], "high-value");
}

#[tokio::test]
async fn test_lead_scores_newest_first() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;
    let ann = create_contact(&app, &token, "ann@example.com").await;

    for (status, source) in [("LOST", "OTHER"), ("QUALIFIED", "REFERRAL")] {
        let (code, _) = send(
            &app,
            "POST",
            "/api/leads",
            Some(&token),
            Some(json!({ "contactId": ann, "source": source, "status": status, "value": 12000 })),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, json) =
        send(&app, "GET", "/api/analytics/lead-scores", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let leads = json["leads"].as_array().unwrap();
    assert_eq!(leads.len(), 2);
    // Same timestamp resolution, so the later id comes first
    assert_eq!(leads[0]["status"], "QUALIFIED");
    assert_eq!(leads[0]["calculatedScore"], 100);
    assert_eq!(leads[0]["scoreHealth"], "hot");
    assert_eq!(leads[0]["scoreLabel"], "Excellent");
    assert_eq!(leads[0]["contact"]["email"], "ann@example.com");
    assert_eq!(leads[0]["contact"]["id"], ann);
    // LOST(0) + OTHER(5) + 10k(20) + fresh(20)
    assert_eq!(leads[1]["calculatedScore"], 45);
    assert_eq!(leads[1]["scoreHealth"], "cold");

    assert_eq!(json["summary"]["hotLeads"], 1);
    assert_eq!(json["summary"]["coldLeads"], 1);
    assert_eq!(json["summary"]["averageScore"], 73);
}

#[tokio::test]
async fn test_audit_log_records_writes() {
    let app = setup_test_app();
    let token = register_and_login(&app, "owner@example.com").await;
    create_contact(&app, &token, "ann@example.com").await;

    let (status, json) = send(&app, "GET", "/api/audit?limit=2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "create");
    assert_eq!(entries[0]["entityType"], "contact");
}

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins(" https://a.example.com, ,https://b.example.com "),
        vec!["https://a.example.com", "https://b.example.com"]
    );
    assert!(parse_origins("").is_empty());
}
