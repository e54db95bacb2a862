use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::timefmt;
use crate::heuristics::DEFAULT_PLATFORM;

/// A scheduled content item as submitted by the planner UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub date: NaiveDate,
    #[serde(with = "timefmt::hh_mm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content_type: String,
}

impl Post {
    /// The platform the recommendation is attributed to. Posts can target
    /// several platforms; the first listed one wins, Instagram if none.
    pub fn primary_platform(&self) -> &str {
        match self.platforms.first() {
            Some(platform) if !platform.trim().is_empty() => platform,
            _ => DEFAULT_PLATFORM,
        }
    }
}

/// Brand context for the prompt and for industry timing lookups. Every field
/// is optional; accessors substitute neutral defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    #[serde(default)]
    pub niche: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
}

impl BrandProfile {
    pub fn niche_or_default(&self) -> &str {
        non_blank(&self.niche).unwrap_or("general content")
    }

    pub fn industry_or_default(&self) -> &str {
        non_blank(&self.industry).unwrap_or("default")
    }

    pub fn audience_or_default(&self) -> &str {
        non_blank(&self.target_audience).unwrap_or("a general audience")
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
