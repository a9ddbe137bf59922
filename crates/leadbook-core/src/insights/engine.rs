//! Insight Engine - aggregates lead stats and runs the insight rules

use chrono::{DateTime, Duration, Utc};

use crate::lead_set::LeadSet;
use crate::models::{Lead, LeadStatus};
use crate::scoring::compute_score;

use super::rules::{
    ActivityNeededRule, ConversionOpportunityRule, HighValueRule, HotProspectsRule,
    StaleLeadsRule,
};
use super::types::{DashboardAnalytics, Funnel, Insight, InsightKind, LeadStats};

/// Width of the "recent" window shared by every time-based rule
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Inputs shared by all insight rules for one evaluation
pub struct AnalysisContext<'a> {
    /// Leads of the organization being analyzed
    pub leads: &'a LeadSet,
    /// Calculated score for each lead, in the same order as `leads`
    pub scores: Vec<u8>,
    pub stats: LeadStats,
    pub now: DateTime<Utc>,
}

impl<'a> AnalysisContext<'a> {
    /// Score every lead and compute stats once for all rules
    pub fn new(leads: &'a LeadSet, total_contacts: usize, now: DateTime<Utc>) -> Self {
        let scores = leads.iter().map(|lead| compute_score(lead, now)).collect();
        Self {
            leads,
            scores,
            stats: compute_stats(leads, total_contacts),
            now,
        }
    }

    /// Start of the recent window; comparisons against it are strict
    pub fn window_start(&self) -> DateTime<Utc> {
        self.now - Duration::days(RECENT_WINDOW_DAYS)
    }

    /// Leads paired with their calculated scores
    pub fn scored(&self) -> impl Iterator<Item = (&'a Lead, u8)> + '_ {
        self.leads.iter().zip(self.scores.iter().copied())
    }
}

/// A single insight rule
pub trait InsightRule: Send + Sync {
    /// Which card this rule produces
    fn kind(&self) -> InsightKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Produce the card, or `None` when the trigger does not hold
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Option<Insight>;
}

/// Runs every registered rule over one organization's leads
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules in display order
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(HotProspectsRule));
        engine.register(Box::new(StaleLeadsRule));
        engine.register(Box::new(HighValueRule));
        engine.register(Box::new(ConversionOpportunityRule));
        engine.register(Box::new(ActivityNeededRule));

        engine
    }

    /// Append a rule; it runs after all previously registered rules
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Evaluate every rule, keeping registration order
    pub fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut insights = vec![];

        for rule in &self.rules {
            match rule.evaluate(ctx) {
                Some(insight) => {
                    tracing::debug!(
                        rule = rule.kind().as_str(),
                        count = insight.count,
                        "Insight triggered"
                    );
                    insights.push(insight);
                }
                None => {
                    tracing::trace!(rule = rule.kind().as_str(), "Insight not triggered");
                }
            }
        }

        insights
    }

    /// Stats, funnel, and insights for one organization
    pub fn derive(
        &self,
        leads: &LeadSet,
        total_contacts: usize,
        now: DateTime<Utc>,
    ) -> DashboardAnalytics {
        let ctx = AnalysisContext::new(leads, total_contacts, now);
        let insights = self.analyze(&ctx);

        DashboardAnalytics {
            stats: ctx.stats,
            funnel: compute_funnel(leads),
            insights,
        }
    }

    /// Get list of registered rule kinds
    pub fn rule_kinds(&self) -> Vec<InsightKind> {
        self.rules.iter().map(|r| r.kind()).collect()
    }
}

/// Derive dashboard analytics with the built-in rules
pub fn derive_insights(
    leads: &LeadSet,
    total_contacts: usize,
    now: DateTime<Utc>,
) -> DashboardAnalytics {
    InsightEngine::new().derive(leads, total_contacts, now)
}

pub fn compute_stats(leads: &LeadSet, total_contacts: usize) -> LeadStats {
    let total_leads = leads.len();
    let total_value = leads.iter().map(|lead| lead.value).sum();
    let with_contact = leads.iter().filter(|lead| lead.contact_id.is_some()).count();

    LeadStats {
        total_leads,
        total_contacts,
        total_value,
        conversion_rate: percentage(with_contact, total_leads),
    }
}

pub fn compute_funnel(leads: &LeadSet) -> Funnel {
    let mut funnel = Funnel::default();
    for lead in leads {
        match lead.status {
            LeadStatus::New => funnel.new += 1,
            LeadStatus::Contacted => funnel.contacted += 1,
            LeadStatus::Qualified => funnel.qualified += 1,
            LeadStatus::Converted => funnel.converted += 1,
            LeadStatus::Unqualified | LeadStatus::Lost => {}
        }
    }
    funnel
}

/// `part / total` as a whole percentage, rounding halves up; 0 for an empty total
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (part, total) = (part as u64, total as u64);
    ((200 * part + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadSource;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn lead(id: i64, status: LeadStatus, age_days: i64) -> Lead {
        let created = now() - Duration::days(age_days);
        Lead {
            id,
            organization_id: 1,
            contact_id: None,
            status,
            source: Some(LeadSource::Website),
            score: 0,
            value: 0.0,
            expected_close_date: None,
            tags: vec![],
            created_at: created,
            updated_at: created,
        }
    }

    fn set(leads: Vec<Lead>) -> LeadSet {
        LeadSet::for_organization(1, leads).unwrap()
    }

    #[test]
    fn test_engine_registers_rules_in_order() {
        let engine = InsightEngine::new();
        assert_eq!(
            engine.rule_kinds(),
            vec![
                InsightKind::HotProspects,
                InsightKind::StaleLeads,
                InsightKind::HighValue,
                InsightKind::ConversionOpportunity,
                InsightKind::ActivityNeeded,
            ]
        );
    }

    #[test]
    fn test_empty_set_yields_nothing() {
        let result = derive_insights(&LeadSet::empty(1), 0, now());
        assert_eq!(result.stats, LeadStats::default());
        assert_eq!(result.funnel, Funnel::default());
        assert!(result.insights.is_empty());
    }

    #[test]
    fn test_empty_set_keeps_contact_count() {
        let result = derive_insights(&LeadSet::empty(1), 4, now());
        assert_eq!(result.stats.total_contacts, 4);
        assert_eq!(result.stats.conversion_rate, 0);
    }

    #[test]
    fn test_stale_new_leads_without_contacts() {
        let leads = (1..=10).map(|id| lead(id, LeadStatus::New, 10)).collect();
        let result = derive_insights(&set(leads), 0, now());

        let gap = result
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::ConversionOpportunity)
            .unwrap();
        assert_eq!(gap.count, 0);
        assert_eq!(
            gap.description,
            "Only 0% of leads have become contacts. Boost engagement!"
        );

        let stale = result
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::StaleLeads)
            .unwrap();
        assert_eq!(stale.count, 10);
        assert_eq!(result.funnel.new, 10);
    }

    #[test]
    fn test_activity_needed_counts_only_old_contacted() {
        let mut leads: Vec<Lead> = (1..=3).map(|id| lead(id, LeadStatus::Contacted, 8)).collect();
        leads.extend((4..=5).map(|id| lead(id, LeadStatus::Contacted, 2)));
        let result = derive_insights(&set(leads), 0, now());

        let activity = result
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::ActivityNeeded)
            .unwrap();
        assert_eq!(activity.count, 3);
        assert_eq!(activity.description, "3 leads need follow-up contact");
    }

    #[test]
    fn test_activity_needed_requires_more_than_two() {
        let leads = (1..=2).map(|id| lead(id, LeadStatus::Contacted, 8)).collect();
        let result = derive_insights(&set(leads), 0, now());
        assert!(result
            .insights
            .iter()
            .all(|i| i.kind != InsightKind::ActivityNeeded));
    }

    #[test]
    fn test_stats_and_funnel() {
        let mut leads = vec![
            lead(1, LeadStatus::New, 1),
            lead(2, LeadStatus::Contacted, 1),
            lead(3, LeadStatus::Qualified, 1),
            lead(4, LeadStatus::Converted, 1),
            lead(5, LeadStatus::Lost, 1),
            lead(6, LeadStatus::Unqualified, 1),
        ];
        leads[0].contact_id = Some(10);
        leads[1].contact_id = Some(11);
        leads[0].value = 1_500.0;
        leads[3].value = 250.5;

        let result = derive_insights(&set(leads), 2, now());
        assert_eq!(result.stats.total_leads, 6);
        assert_eq!(result.stats.total_contacts, 2);
        assert_eq!(result.stats.total_value, 1_750.5);
        // 2 / 6 = 33.3%
        assert_eq!(result.stats.conversion_rate, 33);
        assert_eq!(
            result.funnel,
            Funnel {
                new: 1,
                contacted: 1,
                qualified: 1,
                converted: 1,
            }
        );
    }

    #[test]
    fn test_conversion_rate_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_conversion_gap_needs_more_than_five_leads() {
        let leads = (1..=5).map(|id| lead(id, LeadStatus::New, 1)).collect();
        let result = derive_insights(&set(leads), 0, now());
        assert!(result
            .insights
            .iter()
            .all(|i| i.kind != InsightKind::ConversionOpportunity));
    }

    #[test]
    fn test_derive_is_idempotent() {
        let mut leads: Vec<Lead> = (1..=8)
            .map(|id| lead(id, LeadStatus::ALL[(id as usize) % 6], id * 3))
            .collect();
        leads[2].value = 7_250.0;
        leads[5].contact_id = Some(3);

        let set = set(leads);
        let first = serde_json::to_string(&derive_insights(&set, 1, now())).unwrap();
        let second = serde_json::to_string(&derive_insights(&set, 1, now())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_does_not_mutate_leads() {
        let leads = set(vec![lead(1, LeadStatus::Qualified, 1)]);
        let before = leads.clone();
        let _ = derive_insights(&leads, 0, now());
        assert_eq!(leads, before);
    }

    #[test]
    fn test_custom_rule_runs_after_built_ins() {
        struct AlwaysRule;

        impl InsightRule for AlwaysRule {
            fn kind(&self) -> InsightKind {
                InsightKind::HighValue
            }

            fn name(&self) -> &'static str {
                "Always"
            }

            fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Option<Insight> {
                Some(Insight {
                    kind: self.kind(),
                    title: "Always".to_string(),
                    description: String::new(),
                    count: ctx.leads.len(),
                    color: crate::insights::InsightColor::Blue,
                    action: "None".to_string(),
                })
            }
        }

        let mut engine = InsightEngine::new();
        engine.register(Box::new(AlwaysRule));

        let result = engine.derive(&LeadSet::empty(1), 0, now());
        assert_eq!(result.insights.len(), 1);
        assert_eq!(result.insights[0].title, "Always");
    }
}
