use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::timefmt;

/// A per-post posting-time recommendation, before dates and conflict
/// resolution are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub post_id: String,
    #[serde(with = "timefmt::hh_mm")]
    pub original_time: NaiveTime,
    #[serde(with = "timefmt::hh_mm")]
    pub optimized_time: NaiveTime,
    pub platform: String,
    pub confidence: u8,
    pub reason: String,
}

impl Recommendation {
    pub fn is_changed(&self) -> bool {
        self.optimized_time != self.original_time
    }

    pub fn on_date(self, date: NaiveDate) -> DatedRecommendation {
        DatedRecommendation {
            date,
            rec: self,
            was_adjusted: false,
        }
    }
}

/// A recommendation pinned to its post's calendar date. `was_adjusted` is
/// owned by the conflict resolver and reflects the latest resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedRecommendation {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub rec: Recommendation,
    pub was_adjusted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationSource {
    Ai,
    Fallback,
}

impl OptimizationSource {
    pub fn label(self) -> &'static str {
        match self {
            OptimizationSource::Ai => "ai",
            OptimizationSource::Fallback => "fallback",
        }
    }
}

/// What the engine produced for one batch of posts, tagged with where the
/// times came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutcome {
    pub source: OptimizationSource,
    pub recommendations: Vec<Recommendation>,
    pub reasoning: String,
}
