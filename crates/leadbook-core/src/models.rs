//! Domain models for Leadbook

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A tenant. Every user, contact, and lead belongs to exactly one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User roles within an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    SalesRep,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::SalesRep => "SALES_REP",
            Self::User => "USER",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "SALES_REP" => Ok(Self::SalesRep),
            "USER" => Ok(Self::User),
            _ => Err(format!("Unknown user role: {}", s)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user. The password hash is never part of this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub organization_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: i64,
    pub organization_id: i64,
    pub email: String,
    pub role: UserRole,
}

/// Self-service registration form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Profile changes. A password change needs the current password.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// An issued session. The token is only ever returned here, at login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Contact lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "ARCHIVED" => Ok(Self::Archived),
            _ => Err(format!("Unknown contact status: {}", s)),
        }
    }
}

/// A person the organization is in touch with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub organization_id: i64,
    /// User who created the contact (cleared if that user is deleted)
    pub owner_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact fields accepted on create and full update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ContactStatus>,
}

/// Where in the pipeline a lead currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Unqualified,
    Converted,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Unqualified,
        Self::Converted,
        Self::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Contacted => "CONTACTED",
            Self::Qualified => "QUALIFIED",
            Self::Unqualified => "UNQUALIFIED",
            Self::Converted => "CONVERTED",
            Self::Lost => "LOST",
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NEW" => Ok(Self::New),
            "CONTACTED" => Ok(Self::Contacted),
            "QUALIFIED" => Ok(Self::Qualified),
            "UNQUALIFIED" => Ok(Self::Unqualified),
            "CONVERTED" => Ok(Self::Converted),
            "LOST" => Ok(Self::Lost),
            _ => Err(format!("Unknown lead status: {}", s)),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a lead reached the organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadSource {
    Website,
    Referral,
    ColdCall,
    Email,
    SocialMedia,
    Event,
    Other,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "WEBSITE",
            Self::Referral => "REFERRAL",
            Self::ColdCall => "COLD_CALL",
            Self::Email => "EMAIL",
            Self::SocialMedia => "SOCIAL_MEDIA",
            Self::Event => "EVENT",
            Self::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for LeadSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WEBSITE" => Ok(Self::Website),
            "REFERRAL" => Ok(Self::Referral),
            "COLD_CALL" => Ok(Self::ColdCall),
            "EMAIL" => Ok(Self::Email),
            "SOCIAL_MEDIA" => Ok(Self::SocialMedia),
            "EVENT" => Ok(Self::Event),
            "OTHER" => Ok(Self::Other),
            _ => Err(format!("Unknown lead source: {}", s)),
        }
    }
}

impl std::fmt::Display for LeadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sales lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    pub organization_id: i64,
    pub contact_id: Option<i64>,
    pub status: LeadStatus,
    /// `None` when the stored source is missing or not a known source
    pub source: Option<LeadSource>,
    /// Manually entered score (0-100); analytics use the calculated score instead
    pub score: u8,
    /// Monetary value, never negative
    pub value: f64,
    pub expected_close_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A lead as returned by the API, with its linked contact inlined
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadDetail {
    #[serde(flatten)]
    pub lead: Lead,
    pub contact: Option<Contact>,
}

/// Fields accepted when creating a lead
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub contact_id: i64,
    pub source: LeadSource,
    pub status: LeadStatus,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial lead update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadUpdate {
    #[serde(default)]
    pub source: Option<LeadSource>,
    #[serde(default)]
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub value: Option<f64>,
    /// `Some(None)` clears the date, `None` leaves it as is
    #[serde(default, deserialize_with = "nullable")]
    pub expected_close_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl LeadUpdate {
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.status.is_none()
            && self.score.is_none()
            && self.value.is_none()
            && self.expected_close_date.is_none()
            && self.tags.is_none()
    }
}

/// Distinguish an explicit `null` from a missing field
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Maximum page size for list endpoints
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Default page size for list endpoints
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Page/limit pair, normalized to sane bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let limit = request.limit as i64;
        let pages = ((total + limit - 1) / limit) as u32;
        Self {
            items,
            total,
            page: request.page,
            pages,
        }
    }
}

/// Contact listing filter
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    /// Case-insensitive match on name, email, or company
    pub query: Option<String>,
    pub page: PageRequest,
}

/// Lead listing filter
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    /// Case-insensitive match on the linked contact's name or email
    pub query: Option<String>,
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_status_round_trips_through_str() {
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
        assert!("PENDING".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_lead_source_wire_format() {
        let json = serde_json::to_string(&LeadSource::SocialMedia).unwrap();
        assert_eq!(json, "\"SOCIAL_MEDIA\"");
        assert_eq!("cold_call".parse::<LeadSource>().unwrap(), LeadSource::ColdCall);
    }

    #[test]
    fn test_lead_update_distinguishes_null_from_missing() {
        let update: LeadUpdate = serde_json::from_str(r#"{"expectedCloseDate": null}"#).unwrap();
        assert_eq!(update.expected_close_date, Some(None));

        let update: LeadUpdate = serde_json::from_str(r#"{"status": "LOST"}"#).unwrap();
        assert_eq!(update.expected_close_date, None);
        assert_eq!(update.status, Some(LeadStatus::Lost));
        assert!(!update.is_empty());

        let update: LeadUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_page_request_bounds() {
        let req = PageRequest::new(Some(0), Some(10_000));
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, MAX_PAGE_LIMIT);
        assert_eq!(req.offset(), 0);

        let req = PageRequest::new(Some(3), Some(20));
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page: Page<i64> = Page::new(vec![], 41, PageRequest::new(Some(1), Some(20)));
        assert_eq!(page.pages, 3);

        let empty: Page<i64> = Page::new(vec![], 0, PageRequest::default());
        assert_eq!(empty.pages, 0);
    }
}
