//! User registration and account operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{datetime_column, enum_column, format_datetime, Database};
use crate::auth::{hash_password, verify_password};
use crate::error::{Error, Result};
use crate::models::{AccountUpdate, RegisterInput, User, UserRole};

const USER_COLUMNS: &str = "id, email, name, role, organization_id, created_at, updated_at";

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        role: enum_column(row, 3)?,
        organization_id: row.get(4)?,
        created_at: datetime_column(row, 5)?,
        updated_at: datetime_column(row, 6)?,
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Database {
    /// Register a new user with their own organization
    ///
    /// Validates the form, rejects a taken email with `Error::Conflict`, and
    /// creates "<name>'s Organization" and the user in one transaction.
    pub fn register_user(&self, input: &RegisterInput) -> Result<User> {
        input.validate()?;
        self.create_user(input.name.trim(), &input.email, &input.password, UserRole::User)
    }

    /// Create a user and their organization with an explicit role
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;
        let now = format_datetime(Utc::now());

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)",
            params![email],
            |row| row.get(0),
        )?;
        if taken {
            return Err(Error::Conflict("User with this email already exists".to_string()));
        }

        tx.execute(
            "INSERT INTO organizations (name, email, created_at) VALUES (?, ?, ?)",
            params![format!("{}'s Organization", name), email, now],
        )?;
        let organization_id = tx.last_insert_rowid();

        tx.execute(
            r#"
            INSERT INTO users (email, name, password_hash, role, organization_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![email, name, password_hash, role.as_str(), organization_id, now, now],
        )?;
        let user_id = tx.last_insert_rowid();

        tx.commit()?;

        info!(user_id, organization_id, "Registered user");

        self.get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive)
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![normalize_email(email)],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn password_hash(&self, user_id: i64) -> Result<String> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT password_hash FROM users WHERE id = ?",
            params![user_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    /// Look up a user by email and check their password
    ///
    /// Unknown email and wrong password give the same `Error::Auth`.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<User> {
        let invalid = || Error::Auth("Invalid email or password".to_string());

        let user = self.find_user_by_email(email)?.ok_or_else(invalid)?;
        if !verify_password(password, &self.password_hash(user.id)?)? {
            return Err(invalid());
        }
        Ok(user)
    }

    /// Check a user's current password
    pub fn verify_user_password(&self, user_id: i64, password: &str) -> Result<bool> {
        verify_password(password, &self.password_hash(user_id)?)
    }

    /// Rename a user and/or change their password
    pub fn update_account(&self, user_id: i64, update: &AccountUpdate) -> Result<User> {
        update.validate()?;

        let new_hash = match (&update.new_password, &update.current_password) {
            (Some(new_password), Some(current)) => {
                if !self.verify_user_password(user_id, current)? {
                    return Err(Error::field(
                        "currentPassword",
                        "Current password is incorrect",
                    ));
                }
                Some(hash_password(new_password)?)
            }
            _ => None,
        };

        let now = format_datetime(Utc::now());
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE users SET
                name = COALESCE(?, name),
                password_hash = COALESCE(?, password_hash),
                updated_at = ?
            WHERE id = ?
            "#,
            params![
                update.name.as_deref().map(str::trim),
                new_hash,
                now,
                user_id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }

        self.get_user(user_id)?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    /// Delete a user after confirming their password
    ///
    /// Sessions go with the user; contacts they own are kept with no owner.
    pub fn delete_user(&self, user_id: i64, password: &str) -> Result<()> {
        if !self.verify_user_password(user_id, password)? {
            return Err(Error::Auth("Password is incorrect".to_string()));
        }

        let conn = self.conn()?;
        conn.execute("DELETE FROM users WHERE id = ?", params![user_id])?;

        info!(user_id, "Deleted user");
        Ok(())
    }
}
