use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::recommendation::DatedRecommendation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTally {
    pub changed: usize,
    pub total: usize,
}

/// Batch-level rollup shown next to the recommendation list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSummary {
    pub total: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub avg_confidence: u32,
    pub by_platform: BTreeMap<String, PlatformTally>,
    pub has_changes: bool,
}

pub fn generate_optimization_summary(
    recommendations: &[DatedRecommendation],
) -> OptimizationSummary {
    let total = recommendations.len();
    let mut changed = 0usize;
    let mut confidence_sum = 0u64;
    let mut by_platform: BTreeMap<String, PlatformTally> = BTreeMap::new();

    for dated in recommendations {
        let rec = &dated.rec;
        let tally = by_platform.entry(rec.platform.clone()).or_default();
        tally.total += 1;
        if rec.is_changed() {
            changed += 1;
            tally.changed += 1;
        }
        confidence_sum += u64::from(rec.confidence);
    }

    let avg_confidence = if total == 0 {
        0
    } else {
        ((confidence_sum as f64) / (total as f64)).round() as u32
    };

    OptimizationSummary {
        total,
        changed,
        unchanged: total - changed,
        avg_confidence,
        by_platform,
        has_changes: changed > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::Recommendation;
    use crate::domain::timefmt;
    use chrono::NaiveDate;

    fn dated(id: &str, platform: &str, original: &str, optimized: &str, confidence: u8) -> DatedRecommendation {
        Recommendation {
            post_id: id.to_string(),
            original_time: timefmt::parse_hh_mm(original).unwrap(),
            optimized_time: timefmt::parse_hh_mm(optimized).unwrap(),
            platform: platform.to_string(),
            confidence,
            reason: "peak window".to_string(),
        }
        .on_date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
    }

    #[test]
    fn empty_input_yields_a_zeroed_summary() {
        let summary = generate_optimization_summary(&[]);
        assert_eq!(summary, OptimizationSummary::default());
        assert_eq!(summary.avg_confidence, 0);
        assert!(!summary.has_changes);
    }

    #[test]
    fn counts_reconcile_and_average_rounds() {
        let recs = vec![
            dated("a", "Instagram", "09:00", "11:00", 80),
            dated("b", "Instagram", "13:00", "13:00", 85),
            dated("c", "TikTok", "15:00", "19:00", 96),
        ];
        let summary = generate_optimization_summary(&recs);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.changed, 2);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.changed + summary.unchanged, summary.total);
        assert!(summary.has_changes);
        // (80 + 85 + 96) / 3 = 87.
        assert_eq!(summary.avg_confidence, 87);

        let instagram = summary.by_platform.get("Instagram").unwrap();
        assert_eq!((instagram.changed, instagram.total), (1, 2));
        let tiktok = summary.by_platform.get("TikTok").unwrap();
        assert_eq!((tiktok.changed, tiktok.total), (1, 1));
    }

    #[test]
    fn half_confidence_rounds_up() {
        let recs = vec![
            dated("a", "Instagram", "09:00", "11:00", 80),
            dated("b", "Instagram", "09:00", "11:00", 85),
        ];
        // 82.5 rounds away from zero.
        assert_eq!(generate_optimization_summary(&recs).avg_confidence, 83);
    }

    #[test]
    fn unchanged_batch_reports_no_changes() {
        let recs = vec![dated("a", "Facebook", "13:00", "13:00", 100)];
        let summary = generate_optimization_summary(&recs);
        assert!(!summary.has_changes);
        assert_eq!(summary.changed, 0);
        assert_eq!(summary.unchanged, 1);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = generate_optimization_summary(&[dated("a", "Facebook", "09:00", "13:00", 93)]);
        let encoded = serde_json::to_string(&summary).unwrap();
        assert!(encoded.contains("\"avgConfidence\":93"));
        assert!(encoded.contains("\"byPlatform\":{\"Facebook\""));
        assert!(encoded.contains("\"hasChanges\":true"));
    }
}
