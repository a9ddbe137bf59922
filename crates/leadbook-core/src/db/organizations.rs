//! Organization operations

use rusqlite::{params, OptionalExtension, Row};

use super::{datetime_column, Database};
use crate::error::Result;
use crate::models::Organization;

fn organization_from_row(row: &Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: datetime_column(row, 3)?,
    })
}

impl Database {
    /// Get an organization by ID
    pub fn get_organization(&self, id: i64) -> Result<Option<Organization>> {
        let conn = self.conn()?;
        let org = conn
            .query_row(
                "SELECT id, name, email, created_at FROM organizations WHERE id = ?",
                params![id],
                organization_from_row,
            )
            .optional()?;
        Ok(org)
    }

    /// List all organizations, oldest first
    pub fn list_organizations(&self) -> Result<Vec<Organization>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, email, created_at FROM organizations ORDER BY id")?;

        let orgs = stmt
            .query_map([], organization_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(orgs)
    }
}
