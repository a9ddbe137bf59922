//! Session operations

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{enum_column, format_datetime, Database};
use crate::auth::{generate_session_token, token_digest};
use crate::error::Result;
use crate::models::{AuthUser, LoginInput, Session};

impl Database {
    /// Verify credentials and issue a new bearer session
    pub fn login(&self, input: &LoginInput, ttl_hours: i64, now: DateTime<Utc>) -> Result<Session> {
        let user = self.verify_credentials(&input.email, &input.password)?;
        let (token, expires_at) = self.create_session(user.id, ttl_hours, now)?;

        Ok(Session {
            token,
            expires_at,
            user,
        })
    }

    /// Issue a session token for a user. Returns the token and its expiry.
    pub fn create_session(
        &self,
        user_id: i64,
        ttl_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>)> {
        let token = generate_session_token();
        let expires_at = now + Duration::hours(ttl_hours);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
            params![
                token_digest(&token),
                user_id,
                format_datetime(expires_at),
                format_datetime(now)
            ],
        )?;

        debug!(user_id, "Session created");
        Ok((token, expires_at))
    }

    /// Resolve a bearer token to its user, if the session exists and has not expired
    pub fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Option<AuthUser>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                r#"
                SELECT u.id, u.organization_id, u.email, u.role
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token_hash = ? AND s.expires_at > ?
                "#,
                params![token_digest(token), format_datetime(now)],
                |row| {
                    Ok(AuthUser {
                        user_id: row.get(0)?,
                        organization_id: row.get(1)?,
                        email: row.get(2)?,
                        role: enum_column(row, 3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Revoke a session. Returns false if the token was unknown.
    pub fn revoke_session(&self, token: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![token_digest(token)],
        )?;
        Ok(deleted > 0)
    }

    /// Remove expired sessions. Returns how many were removed.
    pub fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?",
            params![format_datetime(now)],
        )?;
        if deleted > 0 {
            debug!(deleted, "Purged expired sessions");
        }
        Ok(deleted)
    }
}
