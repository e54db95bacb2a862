use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::post::Post;
use crate::domain::recommendation::{DatedRecommendation, OptimizationOutcome, OptimizationSource};
use crate::resolver;
use crate::summary::{self, OptimizationSummary};

/// The full result of one optimization run, in the shape the API returns and
/// the relay webhook receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub source: OptimizationSource,
    pub reasoning: String,
    pub recommendations: Vec<DatedRecommendation>,
    pub summary: OptimizationSummary,
}

/// Pins recommendations to their posts' dates, resolves same-day conflicts
/// and rolls up the summary.
pub fn build_report(
    outcome: OptimizationOutcome,
    posts: &[Post],
    min_gap_minutes: u32,
) -> OptimizationReport {
    let dates_by_id: HashMap<&str, NaiveDate> =
        posts.iter().map(|post| (post.id.as_str(), post.date)).collect();

    let dated: Vec<DatedRecommendation> = outcome
        .recommendations
        .into_iter()
        .filter_map(|rec| {
            dates_by_id
                .get(rec.post_id.as_str())
                .map(|date| rec.on_date(*date))
        })
        .collect();

    let recommendations = resolver::resolve_time_conflicts(dated, min_gap_minutes);
    let summary = summary::generate_optimization_summary(&recommendations);

    OptimizationReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        source: outcome.source,
        reasoning: outcome.reasoning,
        recommendations,
        summary,
    }
}
