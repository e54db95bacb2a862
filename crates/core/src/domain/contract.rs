use crate::domain::post::Post;
use crate::domain::recommendation::Recommendation;
use crate::domain::timefmt;
use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// The JSON document the model is asked to produce. Field names mirror the
/// wire casing so the schema in the prompt and this struct stay in sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmOptimizationPayload {
    pub recommendations: Vec<LlmRecommendationItem>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmRecommendationItem {
    pub post_id: String,
    pub optimized_time: String,
    pub confidence: i64,
    pub reason: String,
}

impl LlmOptimizationPayload {
    /// Checks the model output against the posts the caller actually sent and
    /// converts it into domain recommendations. Original times and platforms
    /// always come from the posts, never from the model.
    pub fn validate_and_into_recommendations(
        self,
        posts: &[Post],
    ) -> anyhow::Result<(Vec<Recommendation>, String)> {
        ensure!(
            !self.recommendations.is_empty(),
            "model output contains no recommendations"
        );

        let posts_by_id: HashMap<&str, &Post> =
            posts.iter().map(|post| (post.id.as_str(), post)).collect();

        let mut seen_ids = BTreeSet::<String>::new();
        let mut recommendations = Vec::with_capacity(self.recommendations.len());
        for item in self.recommendations {
            recommendations.push(item.validate_and_into_recommendation(&posts_by_id, &mut seen_ids)?);
        }

        let reasoning = self.reasoning.trim().to_string();
        ensure!(!reasoning.is_empty(), "reasoning must be non-empty");

        Ok((recommendations, reasoning))
    }
}

impl LlmRecommendationItem {
    fn validate_and_into_recommendation(
        self,
        posts_by_id: &HashMap<&str, &Post>,
        seen_ids: &mut BTreeSet<String>,
    ) -> anyhow::Result<Recommendation> {
        let post_id = self.post_id.trim().to_string();
        ensure!(!post_id.is_empty(), "postId must be non-empty");

        let Some(post) = posts_by_id.get(post_id.as_str()) else {
            bail!("unknown post id in model output: {post_id}");
        };
        ensure!(
            seen_ids.insert(post_id.clone()),
            "duplicate post id in model output: {post_id}"
        );

        let optimized_time = timefmt::parse_hh_mm(&self.optimized_time)?;

        ensure!(
            (0..=100).contains(&self.confidence),
            "confidence must be between 0 and 100 (got {})",
            self.confidence
        );

        let reason = self.reason.trim().to_string();
        ensure!(!reason.is_empty(), "reason must be non-empty");

        Ok(Recommendation {
            post_id,
            original_time: post.time,
            optimized_time,
            platform: post.primary_platform().to_string(),
            confidence: self.confidence as u8,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn posts() -> Vec<Post> {
        vec![
            Post {
                id: "a".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                time: timefmt::parse_hh_mm("09:00").unwrap(),
                platforms: vec!["TikTok".to_string()],
                title: "Teaser".to_string(),
                content_type: "video".to_string(),
            },
            Post {
                id: "b".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
                time: timefmt::parse_hh_mm("14:00").unwrap(),
                platforms: vec![],
                title: "Recap".to_string(),
                content_type: "carousel".to_string(),
            },
        ]
    }

    fn item(post_id: &str, optimized_time: &str, confidence: i64) -> LlmRecommendationItem {
        LlmRecommendationItem {
            post_id: post_id.to_string(),
            optimized_time: optimized_time.to_string(),
            confidence,
            reason: "evening engagement peak".to_string(),
        }
    }

    fn payload(items: Vec<LlmRecommendationItem>) -> LlmOptimizationPayload {
        LlmOptimizationPayload {
            recommendations: items,
            reasoning: "Shift video posts into the evening.".to_string(),
        }
    }

    #[test]
    fn valid_payload_converts_with_caller_owned_fields() {
        let (recs, reasoning) = payload(vec![item("a", "19:00", 92), item("b", "13:00", 85)])
            .validate_and_into_recommendations(&posts())
            .unwrap();

        assert_eq!(reasoning, "Shift video posts into the evening.");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].platform, "TikTok");
        assert_eq!(timefmt::format_hh_mm(recs[0].original_time), "09:00");
        assert_eq!(timefmt::format_hh_mm(recs[0].optimized_time), "19:00");
        // Post "b" lists no platforms, so the default applies.
        assert_eq!(recs[1].platform, "Instagram");
    }

    #[test]
    fn partial_coverage_is_accepted() {
        let (recs, _) = payload(vec![item("b", "13:00", 70)])
            .validate_and_into_recommendations(&posts())
            .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].post_id, "b");
    }

    #[test]
    fn rejects_unknown_post_id() {
        let err = payload(vec![item("ghost", "19:00", 92)])
            .validate_and_into_recommendations(&posts())
            .unwrap_err();
        assert!(err.to_string().contains("unknown post id"));
    }

    #[test]
    fn rejects_duplicate_post_id() {
        let err = payload(vec![item("a", "19:00", 92), item("a", "20:00", 80)])
            .validate_and_into_recommendations(&posts())
            .unwrap_err();
        assert!(err.to_string().contains("duplicate post id"));
    }

    #[test]
    fn rejects_bad_time_and_confidence() {
        assert!(payload(vec![item("a", "25:00", 92)])
            .validate_and_into_recommendations(&posts())
            .is_err());
        assert!(payload(vec![item("a", "19:00", 101)])
            .validate_and_into_recommendations(&posts())
            .is_err());
        assert!(payload(vec![item("a", "19:00", -1)])
            .validate_and_into_recommendations(&posts())
            .is_err());
    }

    #[test]
    fn rejects_empty_recommendations_and_blank_reason() {
        assert!(payload(vec![])
            .validate_and_into_recommendations(&posts())
            .is_err());

        let mut blank = item("a", "19:00", 90);
        blank.reason = "   ".to_string();
        assert!(payload(vec![blank])
            .validate_and_into_recommendations(&posts())
            .is_err());
    }
}
