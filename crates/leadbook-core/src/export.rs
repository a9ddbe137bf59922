//! CSV export of scored leads

use std::io::Write;

use crate::error::Result;
use crate::scoring::ScoredLead;

const HEADER: [&str; 11] = [
    "id",
    "status",
    "source",
    "value",
    "contact_id",
    "expected_close_date",
    "tags",
    "created_at",
    "calculated_score",
    "score_health",
    "score_label",
];

/// Write scored leads as CSV, one row per lead in the given order
///
/// Returns the number of rows written (excluding the header).
pub fn write_scored_leads_csv<W: Write>(writer: W, leads: &[ScoredLead]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for scored in leads {
        let lead = &scored.lead;
        csv.write_record([
            lead.id.to_string(),
            lead.status.as_str().to_string(),
            lead.source.map(|s| s.as_str()).unwrap_or("").to_string(),
            format!("{:.2}", lead.value),
            lead.contact_id.map(|id| id.to_string()).unwrap_or_default(),
            lead.expected_close_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            lead.tags.join(";"),
            lead.created_at.to_rfc3339(),
            scored.calculated_score.to_string(),
            scored.score_health.as_str().to_string(),
            scored.score_label.as_str().to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(leads.len())
}
