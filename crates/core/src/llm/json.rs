use crate::domain::contract::LlmOptimizationPayload;
use crate::domain::post::Post;
use crate::domain::recommendation::Recommendation;
use anyhow::Context;

pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        // Remove Markdown fences (```json ... ``` or ``` ... ```).
        let mut inner = trimmed;
        if let Some(after_first) = inner.splitn(2, '\n').nth(1) {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    // Best-effort extraction: first '{' to last '}'.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim().to_string())
}

/// Parses a completion into validated recommendations plus the reasoning
/// paragraph. `posts` anchors the validation: ids must exist, original times
/// and platforms are taken from here.
pub fn parse_optimization(
    text: &str,
    posts: &[Post],
) -> anyhow::Result<(Vec<Recommendation>, String)> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim().to_string());
    let payload = serde_json::from_str::<LlmOptimizationPayload>(&json_str).with_context(|| {
        format!("model output is not valid JSON for the recommendation schema: {json_str}")
    })?;
    payload.validate_and_into_recommendations(posts)
}
