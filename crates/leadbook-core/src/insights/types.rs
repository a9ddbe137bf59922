//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of insight cards the engine can emit, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightKind {
    /// Qualified, recent leads with a hot calculated score
    HotProspects,
    /// NEW leads older than the recent window
    StaleLeads,
    /// Leads with a large monetary value
    HighValue,
    /// Few leads linked to a contact
    ConversionOpportunity,
    /// CONTACTED leads that have gone quiet
    ActivityNeeded,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::HotProspects => "hot-prospects",
            InsightKind::StaleLeads => "stale-leads",
            InsightKind::HighValue => "high-value",
            InsightKind::ConversionOpportunity => "conversion-opportunity",
            InsightKind::ActivityNeeded => "activity-needed",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hot-prospects" => Ok(InsightKind::HotProspects),
            "stale-leads" => Ok(InsightKind::StaleLeads),
            "high-value" => Ok(InsightKind::HighValue),
            "conversion-opportunity" => Ok(InsightKind::ConversionOpportunity),
            "activity-needed" => Ok(InsightKind::ActivityNeeded),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// Display color hint for an insight card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightColor {
    Red,
    Orange,
    Green,
    Blue,
    Yellow,
}

impl InsightColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightColor::Red => "red",
            InsightColor::Orange => "orange",
            InsightColor::Green => "green",
            InsightColor::Blue => "blue",
            InsightColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for InsightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An actionable dashboard card. Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub count: usize,
    pub color: InsightColor,
    pub action: String,
}

/// Headline numbers for one organization
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total_leads: usize,
    pub total_contacts: usize,
    pub total_value: f64,
    /// Percentage of leads linked to a contact, rounded to a whole number
    pub conversion_rate: u32,
}

/// Lead counts per pipeline stage. UNQUALIFIED and LOST are not tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funnel {
    pub new: usize,
    pub contacted: usize,
    pub qualified: usize,
    pub converted: usize,
}

/// Everything the dashboard endpoint returns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardAnalytics {
    pub stats: LeadStats,
    pub funnel: Funnel,
    pub insights: Vec<Insight>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_kind_round_trip() {
        for kind in [
            InsightKind::HotProspects,
            InsightKind::StaleLeads,
            InsightKind::HighValue,
            InsightKind::ConversionOpportunity,
            InsightKind::ActivityNeeded,
        ] {
            assert_eq!(kind.as_str().parse::<InsightKind>().unwrap(), kind);
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{}\"", kind.as_str())
            );
        }
    }

    #[test]
    fn test_insight_wire_format() {
        let insight = Insight {
            kind: InsightKind::HighValue,
            title: "💰 High-Value Leads".to_string(),
            description: "2 leads worth $12.5k".to_string(),
            count: 2,
            color: InsightColor::Green,
            action: "Prioritize".to_string(),
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "high-value");
        assert_eq!(json["color"], "green");
        assert_eq!(json["count"], 2);
    }

    #[test]
    fn test_stats_camel_case() {
        let json = serde_json::to_value(LeadStats::default()).unwrap();
        assert!(json.get("totalLeads").is_some());
        assert!(json.get("conversionRate").is_some());
    }
}
