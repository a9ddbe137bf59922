//! Lead operations

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::contacts::{contact_from_row, CONTACT_COLUMNS};
use super::{
    conversion_error, date_column, datetime_column, enum_column, format_datetime, like_pattern,
    Database,
};
use crate::error::{Error, Result};
use crate::lead_set::LeadSet;
use crate::models::{Lead, LeadDetail, LeadFilter, LeadUpdate, NewLead, Page};

const LEAD_COLUMNS: &str = "l.id, l.organization_id, l.contact_id, l.status, l.source, l.score, \
     l.value, l.expected_close_date, l.tags, l.created_at, l.updated_at";

/// Number of columns in `LEAD_COLUMNS`; joined contact columns start here
const LEAD_COLUMN_COUNT: usize = 11;

const LEAD_SEARCH: &str = "(LOWER(COALESCE(c.first_name, '')) LIKE ?3 \
     OR LOWER(COALESCE(c.last_name, '')) LIKE ?3 OR LOWER(COALESCE(c.email, '')) LIKE ?3)";

fn lead_from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let source: Option<String> = row.get(4)?;
    let score: i64 = row.get(5)?;
    let tags: String = row.get(8)?;

    Ok(Lead {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        contact_id: row.get(2)?,
        status: enum_column(row, 3)?,
        source: source.and_then(|s| s.parse().ok()),
        score: u8::try_from(score)
            .map_err(|_| conversion_error(5, format!("Score out of range: {}", score)))?,
        value: row.get(6)?,
        expected_close_date: date_column(row, 7)?,
        tags: serde_json::from_str(&tags)
            .map_err(|e| conversion_error(8, format!("Invalid tags: {}", e)))?,
        created_at: datetime_column(row, 9)?,
        updated_at: datetime_column(row, 10)?,
    })
}

fn lead_detail_from_row(row: &Row<'_>) -> rusqlite::Result<LeadDetail> {
    let contact_id: Option<i64> = row.get(LEAD_COLUMN_COUNT)?;
    let contact = match contact_id {
        Some(_) => Some(contact_from_row(row, LEAD_COLUMN_COUNT)?),
        None => None,
    };

    Ok(LeadDetail {
        lead: lead_from_row(row)?,
        contact,
    })
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn tags_json(tags: &[String]) -> Result<String> {
    let cleaned: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    Ok(serde_json::to_string(&cleaned)?)
}

impl Database {
    /// Create a lead for a contact in the same organization
    ///
    /// A contact from another organization is reported as not found.
    pub fn create_lead(
        &self,
        organization_id: i64,
        input: &NewLead,
        now: DateTime<Utc>,
    ) -> Result<LeadDetail> {
        input.validate()?;

        if self.get_contact(organization_id, input.contact_id)?.is_none() {
            return Err(Error::NotFound(
                "Contact not found or access denied".to_string(),
            ));
        }

        let now = format_datetime(now);
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO leads (organization_id, contact_id, status, source, score, value,
                               expected_close_date, tags, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                organization_id,
                input.contact_id,
                input.status.as_str(),
                input.source.as_str(),
                input.score,
                input.value,
                format_date(input.expected_close_date),
                tags_json(&input.tags)?,
                now,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();

        debug!(lead_id = id, organization_id, "Lead created");

        self.get_lead(organization_id, id)?
            .ok_or_else(|| Error::NotFound("Lead not found".to_string()))
    }

    /// Get a lead with its contact, scoped to an organization
    pub fn get_lead(&self, organization_id: i64, id: i64) -> Result<Option<LeadDetail>> {
        let conn = self.conn()?;
        let lead = conn
            .query_row(
                &format!(
                    r#"
                    SELECT {}, {} FROM leads l
                    LEFT JOIN contacts c ON c.id = l.contact_id
                    WHERE l.id = ? AND l.organization_id = ?
                    "#,
                    LEAD_COLUMNS, CONTACT_COLUMNS
                ),
                params![id, organization_id],
                lead_detail_from_row,
            )
            .optional()?;
        Ok(lead)
    }

    /// List leads, newest first, filtered by status and contact name/email
    pub fn list_leads(
        &self,
        organization_id: i64,
        filter: &LeadFilter,
    ) -> Result<Page<LeadDetail>> {
        let conn = self.conn()?;
        let status = filter.status.map(|s| s.as_str());
        let pattern = like_pattern(filter.query.as_deref());
        let search = if pattern.is_some() {
            format!("AND {}", LEAD_SEARCH)
        } else {
            "AND ?3 IS NULL".to_string()
        };
        let where_clause = format!(
            "WHERE l.organization_id = ?1 AND (?2 IS NULL OR l.status = ?2) {}",
            search
        );

        let total: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM leads l LEFT JOIN contacts c ON c.id = l.contact_id {}",
                where_clause
            ),
            params![organization_id, status, pattern],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}, {} FROM leads l
            LEFT JOIN contacts c ON c.id = l.contact_id
            {}
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT ?4 OFFSET ?5
            "#,
            LEAD_COLUMNS, CONTACT_COLUMNS, where_clause
        ))?;

        let leads = stmt
            .query_map(
                params![
                    organization_id,
                    status,
                    pattern,
                    filter.page.limit,
                    filter.page.offset()
                ],
                lead_detail_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Page::new(leads, total, filter.page))
    }

    /// Apply a partial update. `created_at` never changes.
    pub fn update_lead(
        &self,
        organization_id: i64,
        id: i64,
        update: &LeadUpdate,
        now: DateTime<Utc>,
    ) -> Result<LeadDetail> {
        update.validate()?;

        let mut lead = self
            .get_lead(organization_id, id)?
            .ok_or_else(|| Error::NotFound("Lead not found".to_string()))?
            .lead;

        if let Some(source) = update.source {
            lead.source = Some(source);
        }
        if let Some(status) = update.status {
            lead.status = status;
        }
        if let Some(score) = update.score {
            lead.score = score;
        }
        if let Some(value) = update.value {
            lead.value = value;
        }
        if let Some(date) = update.expected_close_date {
            lead.expected_close_date = date;
        }
        if let Some(tags) = &update.tags {
            lead.tags = tags.clone();
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE leads SET
                status = ?, source = ?, score = ?, value = ?,
                expected_close_date = ?, tags = ?, updated_at = ?
            WHERE id = ? AND organization_id = ?
            "#,
            params![
                lead.status.as_str(),
                lead.source.map(|s| s.as_str()),
                lead.score,
                lead.value,
                format_date(lead.expected_close_date),
                tags_json(&lead.tags)?,
                format_datetime(now),
                id,
                organization_id,
            ],
        )?;

        self.get_lead(organization_id, id)?
            .ok_or_else(|| Error::NotFound("Lead not found".to_string()))
    }

    pub fn delete_lead(&self, organization_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM leads WHERE id = ? AND organization_id = ?",
            params![id, organization_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound("Lead not found".to_string()));
        }
        Ok(())
    }

    /// Every lead of an organization, oldest first, ready for scoring and insights
    pub fn list_all_leads(&self, organization_id: i64) -> Result<LeadSet> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM leads l WHERE l.organization_id = ? ORDER BY l.created_at, l.id",
            LEAD_COLUMNS
        ))?;

        let leads = stmt
            .query_map(params![organization_id], lead_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        LeadSet::for_organization(organization_id, leads)
    }

    /// Every lead of an organization with its contact, newest first
    pub fn list_all_lead_details(&self, organization_id: i64) -> Result<Vec<LeadDetail>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}, {} FROM leads l
            LEFT JOIN contacts c ON c.id = l.contact_id
            WHERE l.organization_id = ?
            ORDER BY l.created_at DESC, l.id DESC
            "#,
            LEAD_COLUMNS, CONTACT_COLUMNS
        ))?;

        let leads = stmt
            .query_map(params![organization_id], lead_detail_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(leads)
    }
}
