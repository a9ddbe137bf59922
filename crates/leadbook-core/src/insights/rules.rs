//! Built-in insight rules
//!
//! Each rule looks at the whole lead set and emits at most one card.

use crate::models::LeadStatus;
use crate::scoring::HOT_THRESHOLD;

use super::engine::{AnalysisContext, InsightRule};
use super::types::{Insight, InsightColor, InsightKind};

/// Minimum lead value for the high-value card
pub const HIGH_VALUE_THRESHOLD: f64 = 5_000.0;

/// The conversion gap card shows while the rate is below this percentage
pub const CONVERSION_GAP_RATE: u32 = 50;

/// ...and the organization has more than this many leads
pub const CONVERSION_GAP_MIN_LEADS: usize = 5;

/// The inactive leads card needs more than this many quiet leads
pub const ACTIVITY_NEEDED_MIN: usize = 2;

fn card(
    kind: InsightKind,
    title: &str,
    description: String,
    count: usize,
    color: InsightColor,
    action: &str,
) -> Insight {
    Insight {
        kind,
        title: title.to_string(),
        description,
        count,
        color,
        action: action.to_string(),
    }
}

/// QUALIFIED leads created inside the recent window with a hot calculated score
///
/// The stored manual `score` field is not consulted.
pub struct HotProspectsRule;

impl InsightRule for HotProspectsRule {
    fn kind(&self) -> InsightKind {
        InsightKind::HotProspects
    }

    fn name(&self) -> &'static str {
        "Hot Prospects"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Option<Insight> {
        let window_start = ctx.window_start();
        let count = ctx
            .scored()
            .filter(|(lead, score)| {
                lead.status == LeadStatus::Qualified
                    && *score >= HOT_THRESHOLD
                    && lead.created_at > window_start
            })
            .count();

        (count > 0).then(|| {
            card(
                self.kind(),
                "🔥 Hot Prospects",
                format!("{} highly qualified leads ready to close", count),
                count,
                InsightColor::Red,
                "View Prospects",
            )
        })
    }
}

/// NEW leads nobody has touched since before the recent window
pub struct StaleLeadsRule;

impl InsightRule for StaleLeadsRule {
    fn kind(&self) -> InsightKind {
        InsightKind::StaleLeads
    }

    fn name(&self) -> &'static str {
        "Stale Leads"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Option<Insight> {
        let window_start = ctx.window_start();
        let count = ctx
            .leads
            .iter()
            .filter(|lead| lead.status == LeadStatus::New && lead.created_at < window_start)
            .count();

        (count > 0).then(|| {
            card(
                self.kind(),
                "📉 Stale Leads",
                format!("{} leads haven't been contacted in a week", count),
                count,
                InsightColor::Orange,
                "Follow Up",
            )
        })
    }
}

/// Leads worth at least `HIGH_VALUE_THRESHOLD`
pub struct HighValueRule;

impl InsightRule for HighValueRule {
    fn kind(&self) -> InsightKind {
        InsightKind::HighValue
    }

    fn name(&self) -> &'static str {
        "High-Value Leads"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Option<Insight> {
        let (count, total) = ctx
            .leads
            .iter()
            .filter(|lead| lead.value >= HIGH_VALUE_THRESHOLD)
            .fold((0usize, 0.0f64), |(n, sum), lead| (n + 1, sum + lead.value));

        // Tenths of a thousand, halves rounded up
        let thousands = (total / 100.0).round() / 10.0;

        (count > 0).then(|| {
            card(
                self.kind(),
                "💰 High-Value Leads",
                format!("{} leads worth ${:.1}k", count, thousands),
                count,
                InsightColor::Green,
                "Prioritize",
            )
        })
    }
}

/// Too few leads linked to a contact
pub struct ConversionOpportunityRule;

impl InsightRule for ConversionOpportunityRule {
    fn kind(&self) -> InsightKind {
        InsightKind::ConversionOpportunity
    }

    fn name(&self) -> &'static str {
        "Conversion Gap"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Option<Insight> {
        let rate = ctx.stats.conversion_rate;
        let triggered =
            rate < CONVERSION_GAP_RATE && ctx.stats.total_leads > CONVERSION_GAP_MIN_LEADS;

        triggered.then(|| {
            card(
                self.kind(),
                "📈 Conversion Gap",
                format!(
                    "Only {}% of leads have become contacts. Boost engagement!",
                    rate
                ),
                rate as usize,
                InsightColor::Blue,
                "Improve Strategy",
            )
        })
    }
}

/// CONTACTED leads that have not moved since before the recent window
pub struct ActivityNeededRule;

impl InsightRule for ActivityNeededRule {
    fn kind(&self) -> InsightKind {
        InsightKind::ActivityNeeded
    }

    fn name(&self) -> &'static str {
        "Inactive Leads"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Option<Insight> {
        let window_start = ctx.window_start();
        let count = ctx
            .leads
            .iter()
            .filter(|lead| lead.status == LeadStatus::Contacted && lead.created_at < window_start)
            .count();

        (count > ACTIVITY_NEEDED_MIN).then(|| {
            card(
                self.kind(),
                "⚠️ Inactive Leads",
                format!("{} leads need follow-up contact", count),
                count,
                InsightColor::Yellow,
                "Schedule Calls",
            )
        })
    }
}
