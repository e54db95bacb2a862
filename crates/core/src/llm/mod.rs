pub mod error;
pub mod json;
pub mod proxy;

use crate::domain::post::{BrandProfile, Post};
use crate::domain::recommendation::Recommendation;
use crate::heuristics::DEFAULT_PLATFORM;

/// One optimization request: the brand context plus the posts to schedule.
#[derive(Debug, Clone)]
pub struct GenerateInput {
    pub brand: BrandProfile,
    pub posts: Vec<Post>,
}

impl GenerateInput {
    pub fn try_new(brand: BrandProfile, posts: Vec<Post>) -> anyhow::Result<Self> {
        anyhow::ensure!(!posts.is_empty(), "no posts provided for optimization");
        Ok(Self { brand, posts })
    }

    /// Platforms referenced across the batch, deduplicated in first-seen
    /// order. Never empty.
    pub fn distinct_platforms(&self) -> Vec<String> {
        let mut platforms: Vec<String> = Vec::new();
        for post in &self.posts {
            for platform in &post.platforms {
                if !platforms.iter().any(|known| known == platform) {
                    platforms.push(platform.clone());
                }
            }
        }
        if platforms.is_empty() {
            platforms.push(DEFAULT_PLATFORM.to_string());
        }
        platforms
    }
}

/// Validated model output: one recommendation per covered post plus the
/// batch-level strategy paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptimization {
    pub recommendations: Vec<Recommendation>,
    pub reasoning: String,
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate_optimization(&self, input: GenerateInput)
        -> anyhow::Result<ModelOptimization>;
}
