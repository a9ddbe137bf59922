//! Export command implementation

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use leadbook_core::db::Database;
use leadbook_core::{score_leads, sort_newest_first, write_scored_leads_csv};

use super::require_organization;

/// Export an organization's scored leads as CSV, newest first
///
/// Writes to `output` when given, otherwise to stdout.
pub fn cmd_export(db: &Database, org: i64, output: Option<&Path>) -> Result<()> {
    require_organization(db, org)?;
    let leads = db
        .list_all_leads(org)
        .context("Failed to load leads")?;

    let mut scored = score_leads(&leads, Utc::now());
    sort_newest_first(&mut scored);

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let rows = write_scored_leads_csv(BufWriter::new(file), &scored)
                .context("Failed to write CSV")?;
            println!("✅ Exported {} leads to {}", rows, path.display());
        }
        None => {
            let stdout = io::stdout();
            write_scored_leads_csv(stdout.lock(), &scored).context("Failed to write CSV")?;
        }
    }

    Ok(())
}
