//! Contact operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{datetime_column, enum_column, format_datetime, like_pattern, Database};
use crate::error::{Error, Result};
use crate::models::{Contact, ContactFilter, ContactInput, Page};

pub(crate) const CONTACT_COLUMNS: &str = "c.id, c.organization_id, c.owner_id, c.first_name, \
     c.last_name, c.email, c.phone, c.company, c.job_title, c.source, c.notes, c.status, \
     c.created_at, c.updated_at";

/// Map a contact from `CONTACT_COLUMNS` starting at column `offset`
pub(crate) fn contact_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(offset)?,
        organization_id: row.get(offset + 1)?,
        owner_id: row.get(offset + 2)?,
        first_name: row.get(offset + 3)?,
        last_name: row.get(offset + 4)?,
        email: row.get(offset + 5)?,
        phone: row.get(offset + 6)?,
        company: row.get(offset + 7)?,
        job_title: row.get(offset + 8)?,
        source: row.get(offset + 9)?,
        notes: row.get(offset + 10)?,
        status: enum_column(row, offset + 11)?,
        created_at: datetime_column(row, offset + 12)?,
        updated_at: datetime_column(row, offset + 13)?,
    })
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

const CONTACT_SEARCH: &str = "(LOWER(c.first_name) LIKE ?2 OR LOWER(c.last_name) LIKE ?2 \
     OR LOWER(c.email) LIKE ?2 OR LOWER(COALESCE(c.company, '')) LIKE ?2)";

impl Database {
    /// Create a contact owned by `owner_id` in an organization
    pub fn create_contact(
        &self,
        organization_id: i64,
        owner_id: Option<i64>,
        input: &ContactInput,
    ) -> Result<Contact> {
        input.validate()?;

        let now = format_datetime(Utc::now());
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO contacts (organization_id, owner_id, first_name, last_name, email,
                                  phone, company, job_title, source, notes, status,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                organization_id,
                owner_id,
                input.first_name.trim(),
                input.last_name.trim(),
                input.email.trim(),
                blank_to_none(&input.phone),
                blank_to_none(&input.company),
                blank_to_none(&input.job_title),
                blank_to_none(&input.source),
                blank_to_none(&input.notes),
                input.status.unwrap_or_default().as_str(),
                now,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_contact(organization_id, id)?
            .ok_or_else(|| Error::NotFound("Contact not found".to_string()))
    }

    /// Get a contact, scoped to an organization
    pub fn get_contact(&self, organization_id: i64, id: i64) -> Result<Option<Contact>> {
        let conn = self.conn()?;
        let contact = conn
            .query_row(
                &format!(
                    "SELECT {} FROM contacts c WHERE c.id = ? AND c.organization_id = ?",
                    CONTACT_COLUMNS
                ),
                params![id, organization_id],
                |row| contact_from_row(row, 0),
            )
            .optional()?;
        Ok(contact)
    }

    /// List contacts, newest first, with optional name/email/company search
    pub fn list_contacts(
        &self,
        organization_id: i64,
        filter: &ContactFilter,
    ) -> Result<Page<Contact>> {
        let conn = self.conn()?;
        let pattern = like_pattern(filter.query.as_deref());
        let search = if pattern.is_some() {
            format!("AND {}", CONTACT_SEARCH)
        } else {
            // Keep ?2 bound so both variants take the same parameters
            "AND ?2 IS NULL".to_string()
        };

        let total: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM contacts c WHERE c.organization_id = ?1 {}",
                search
            ),
            params![organization_id, pattern],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM contacts c
            WHERE c.organization_id = ?1 {}
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT ?3 OFFSET ?4
            "#,
            CONTACT_COLUMNS, search
        ))?;

        let contacts = stmt
            .query_map(
                params![
                    organization_id,
                    pattern,
                    filter.page.limit,
                    filter.page.offset()
                ],
                |row| contact_from_row(row, 0),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Page::new(contacts, total, filter.page))
    }

    /// Replace a contact's editable fields
    pub fn update_contact(
        &self,
        organization_id: i64,
        id: i64,
        input: &ContactInput,
    ) -> Result<Contact> {
        input.validate()?;

        let now = format_datetime(Utc::now());
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE contacts SET
                first_name = ?, last_name = ?, email = ?, phone = ?, company = ?,
                job_title = ?, source = ?, notes = ?, status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ? AND organization_id = ?
            "#,
            params![
                input.first_name.trim(),
                input.last_name.trim(),
                input.email.trim(),
                blank_to_none(&input.phone),
                blank_to_none(&input.company),
                blank_to_none(&input.job_title),
                blank_to_none(&input.source),
                blank_to_none(&input.notes),
                input.status.map(|s| s.as_str()),
                now,
                id,
                organization_id,
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound("Contact not found".to_string()));
        }

        self.get_contact(organization_id, id)?
            .ok_or_else(|| Error::NotFound("Contact not found".to_string()))
    }

    /// Delete a contact. Leads that pointed at it keep existing without a contact.
    pub fn delete_contact(&self, organization_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM contacts WHERE id = ? AND organization_id = ?",
            params![id, organization_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound("Contact not found".to_string()));
        }
        Ok(())
    }

    /// Count an organization's contacts
    pub fn count_contacts(&self, organization_id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE organization_id = ?",
            params![organization_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
