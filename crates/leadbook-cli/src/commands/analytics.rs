//! Lead scoring and insight commands

use anyhow::{Context, Result};
use chrono::Utc;
use leadbook_core::db::Database;
use leadbook_core::{derive_insights, score_leads, sort_newest_first, ScoreHealth, ScoreSummary};

use super::{require_organization, truncate};

fn health_icon(health: ScoreHealth) -> &'static str {
    match health {
        ScoreHealth::Hot => "🔥",
        ScoreHealth::Warm => "🌤️",
        ScoreHealth::Cold => "🧊",
    }
}

/// Print every lead of an organization with its calculated score, newest first
pub fn cmd_scores(db: &Database, org: i64) -> Result<()> {
    let organization = require_organization(db, org)?;
    let leads = db
        .list_all_leads(org)
        .context("Failed to load leads")?;

    if leads.is_empty() {
        println!("No leads found for {}.", organization.name);
        return Ok(());
    }

    let mut scored = score_leads(&leads, Utc::now());
    sort_newest_first(&mut scored);
    let summary = ScoreSummary::from_scored(&scored);

    println!();
    println!("🎯 Lead Scores - {}", organization.name);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>6}  {:<12} {:<13} {:>12}  {:>5}  {}",
        "ID", "Status", "Source", "Value", "Score", "Label"
    );

    for lead in &scored {
        let source = lead.lead.source.map(|s| s.as_str()).unwrap_or("-");
        println!(
            "   {:>6}  {:<12} {:<13} {:>12.2}  {:>5}  {} {}",
            lead.lead.id,
            lead.lead.status.as_str(),
            truncate(source, 13),
            lead.lead.value,
            lead.calculated_score,
            health_icon(lead.score_health),
            lead.score_label,
        );
    }

    println!();
    println!(
        "   🔥 Hot: {}   🌤️ Warm: {}   🧊 Cold: {}   Average: {}",
        summary.hot_leads, summary.warm_leads, summary.cold_leads, summary.average_score
    );

    Ok(())
}

/// Print dashboard stats, funnel, and insight cards for an organization
pub fn cmd_insights(db: &Database, org: i64) -> Result<()> {
    let organization = require_organization(db, org)?;
    let leads = db
        .list_all_leads(org)
        .context("Failed to load leads")?;
    let total_contacts = db
        .count_contacts(org)
        .context("Failed to count contacts")?;

    let dashboard = derive_insights(&leads, total_contacts, Utc::now());
    let stats = &dashboard.stats;
    let funnel = &dashboard.funnel;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           📈 Leadbook Dashboard          │");
    println!("╰─────────────────────────────────────────╯");
    println!("  {}", organization.name);
    println!();
    println!("  Leads:           {}", stats.total_leads);
    println!("  Contacts:        {}", stats.total_contacts);
    println!("  Pipeline value:  ${:.2}", stats.total_value);
    println!("  Conversion rate: {}%", stats.conversion_rate);
    println!();
    println!("  Funnel");
    println!("     New:       {}", funnel.new);
    println!("     Contacted: {}", funnel.contacted);
    println!("     Qualified: {}", funnel.qualified);
    println!("     Converted: {}", funnel.converted);
    println!();

    if dashboard.insights.is_empty() {
        println!("✅ Nothing needs attention right now.");
        return Ok(());
    }

    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    for insight in &dashboard.insights {
        println!("   [{}] {} ({})", insight.kind, insight.title, insight.count);
        println!("      {}", insight.description);
        println!("      → {}", insight.action);
    }

    Ok(())
}
