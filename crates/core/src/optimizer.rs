use anyhow::ensure;

use crate::domain::post::{BrandProfile, Post};
use crate::domain::recommendation::{OptimizationOutcome, OptimizationSource, Recommendation};
use crate::heuristics;
use crate::llm::{GenerateInput, LlmClient};

/// Produces one recommendation per post, preferring the model path and
/// silently falling back to the heuristic tables when it fails. Only an
/// empty batch is an error.
pub async fn generate_optimal_times(
    brand: &BrandProfile,
    posts: &[Post],
    llm: Option<&dyn LlmClient>,
) -> anyhow::Result<OptimizationOutcome> {
    ensure!(!posts.is_empty(), "no posts provided for optimization");

    if let Some(client) = llm {
        let input = GenerateInput::try_new(brand.clone(), posts.to_vec())?;
        match client.generate_optimization(input).await {
            Ok(model) => {
                tracing::info!(
                    client = client.name(),
                    recommendations = model.recommendations.len(),
                    "model produced posting-time recommendations"
                );
                return Ok(OptimizationOutcome {
                    source: OptimizationSource::Ai,
                    recommendations: model.recommendations,
                    reasoning: model.reasoning,
                });
            }
            Err(err) => {
                tracing::warn!(
                    client = client.name(),
                    error = %err,
                    "model path failed; using heuristic tables"
                );
            }
        }
    }

    let (recommendations, reasoning) = fallback_optimal_times(brand, posts);
    Ok(OptimizationOutcome {
        source: OptimizationSource::Fallback,
        recommendations,
        reasoning,
    })
}

/// Deterministic table-driven assignment. Post i takes slot `i mod 4` of its
/// platform's ranked list, so several posts on one platform spread across
/// the day instead of piling onto the top slot.
pub fn fallback_optimal_times(
    brand: &BrandProfile,
    posts: &[Post],
) -> (Vec<Recommendation>, String) {
    let mut recommendations = Vec::with_capacity(posts.len());
    for (index, post) in posts.iter().enumerate() {
        let platform = post.primary_platform();
        let table = heuristics::best_times_for(platform);
        let slot = &table.slots[index % table.slots.len()];

        let rec = if post.time == slot.time {
            Recommendation {
                post_id: post.id.clone(),
                original_time: post.time,
                optimized_time: post.time,
                platform: platform.to_string(),
                confidence: 100,
                reason: "Already scheduled at an optimal time".to_string(),
            }
        } else {
            Recommendation {
                post_id: post.id.clone(),
                original_time: post.time,
                optimized_time: slot.time,
                platform: platform.to_string(),
                confidence: slot.score,
                reason: format!("{} tends to perform well on {}", slot.label, platform),
            }
        };
        recommendations.push(rec);
    }

    let timing = heuristics::timing_for(brand.industry_or_default());
    let lead_platform = posts
        .first()
        .map(|post| post.primary_platform())
        .unwrap_or(heuristics::DEFAULT_PLATFORM);
    let lead_table = heuristics::best_times_for(lead_platform);
    let reasoning = format!(
        "Times chosen from engagement tables for {}. {}",
        timing.audience_type, lead_table.tip
    );

    (recommendations, reasoning)
}
