//! Lead scoring
//!
//! A lead's calculated score is the sum of four weighted factors, clamped to
//! 0..=100:
//!
//! | Factor  | Range | Driven by                          |
//! |---------|-------|------------------------------------|
//! | Status  | 0-40  | pipeline stage (CONVERTED is 100)  |
//! | Source  | 0-20  | acquisition channel                |
//! | Value   | 0-20  | monetary value band                |
//! | Recency | 0-20  | whole days since the lead was made |
//!
//! All functions are pure. `now` is always passed in by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Lead, LeadSource, LeadStatus};

/// Scores at or above this are "hot"
pub const HOT_THRESHOLD: u8 = 75;

/// Scores at or above this (and below hot) are "warm"
pub const WARM_THRESHOLD: u8 = 50;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Coarse temperature of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreHealth {
    Hot,
    Warm,
    Cold,
}

impl ScoreHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
        }
    }
}

impl std::fmt::Display for ScoreHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive label for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLabel {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl ScoreLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

impl std::fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn status_points(status: LeadStatus) -> u32 {
    match status {
        LeadStatus::New => 10,
        LeadStatus::Contacted => 25,
        LeadStatus::Qualified => 40,
        LeadStatus::Unqualified => 0,
        LeadStatus::Converted => 100,
        LeadStatus::Lost => 0,
    }
}

fn source_points(source: Option<LeadSource>) -> u32 {
    match source {
        Some(LeadSource::Referral) => 20,
        Some(LeadSource::Event) => 18,
        Some(LeadSource::Website) => 15,
        Some(LeadSource::Email) => 15,
        Some(LeadSource::SocialMedia) => 12,
        Some(LeadSource::ColdCall) => 10,
        Some(LeadSource::Other) => 5,
        None => 0,
    }
}

fn value_points(value: f64) -> u32 {
    if value >= 10_000.0 {
        20
    } else if value >= 5_000.0 {
        15
    } else if value >= 1_000.0 {
        10
    } else if value > 0.0 {
        5
    } else {
        0
    }
}

fn recency_points(days_old: i64) -> u32 {
    if days_old <= 7 {
        20
    } else if days_old <= 14 {
        15
    } else if days_old <= 30 {
        10
    } else if days_old <= 60 {
        5
    } else {
        0
    }
}

/// Whole days elapsed between `created_at` and `now`, rounded down
pub fn days_old(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

/// Calculate a lead's score from its status, source, value, and age
pub fn compute_score(lead: &Lead, now: DateTime<Utc>) -> u8 {
    let total = status_points(lead.status)
        + source_points(lead.source)
        + value_points(lead.value)
        + recency_points(days_old(lead.created_at, now));

    total.min(100) as u8
}

pub fn classify_health(score: u8) -> ScoreHealth {
    if score >= HOT_THRESHOLD {
        ScoreHealth::Hot
    } else if score >= WARM_THRESHOLD {
        ScoreHealth::Warm
    } else {
        ScoreHealth::Cold
    }
}

pub fn classify_label(score: u8) -> ScoreLabel {
    if score >= 90 {
        ScoreLabel::Excellent
    } else if score >= 75 {
        ScoreLabel::VeryGood
    } else if score >= 60 {
        ScoreLabel::Good
    } else if score >= 50 {
        ScoreLabel::Fair
    } else if score >= 30 {
        ScoreLabel::Poor
    } else {
        ScoreLabel::VeryPoor
    }
}

/// A lead together with its calculated score and classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredLead {
    #[serde(flatten)]
    pub lead: Lead,
    pub calculated_score: u8,
    pub score_health: ScoreHealth,
    pub score_label: ScoreLabel,
}

impl ScoredLead {
    pub fn new(lead: Lead, now: DateTime<Utc>) -> Self {
        let calculated_score = compute_score(&lead, now);
        Self {
            lead,
            calculated_score,
            score_health: classify_health(calculated_score),
            score_label: classify_label(calculated_score),
        }
    }
}

/// Score every lead, keeping input order
pub fn score_leads<'a, I>(leads: I, now: DateTime<Utc>) -> Vec<ScoredLead>
where
    I: IntoIterator<Item = &'a Lead>,
{
    leads
        .into_iter()
        .map(|lead| ScoredLead::new(lead.clone(), now))
        .collect()
}

/// Order scored leads newest first, breaking timestamp ties by id
pub fn sort_newest_first(scored: &mut [ScoredLead]) {
    scored.sort_by(|a, b| {
        b.lead
            .created_at
            .cmp(&a.lead.created_at)
            .then(b.lead.id.cmp(&a.lead.id))
    });
}

/// Distribution of calculated scores across a set of leads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub hot_leads: usize,
    pub warm_leads: usize,
    pub cold_leads: usize,
    pub average_score: u8,
}

impl ScoreSummary {
    pub fn from_scored(scored: &[ScoredLead]) -> Self {
        let mut summary = Self::default();
        if scored.is_empty() {
            return summary;
        }

        let mut total: u64 = 0;
        for lead in scored {
            total += lead.calculated_score as u64;
            match lead.score_health {
                ScoreHealth::Hot => summary.hot_leads += 1,
                ScoreHealth::Warm => summary.warm_leads += 1,
                ScoreHealth::Cold => summary.cold_leads += 1,
            }
        }

        // Half-up rounding of the mean
        let count = scored.len() as u64;
        summary.average_score = ((2 * total + count) / (2 * count)) as u8;
        summary
    }
}
