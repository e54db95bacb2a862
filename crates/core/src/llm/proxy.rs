use crate::config::Settings;
use crate::domain::post::Post;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::json;
use crate::llm::{GenerateInput, LlmClient, ModelOptimization};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CLIENT_NAME: &str = "proxy";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 45;
const TEMPERATURE: f32 = 0.2;

/// Chat-completion client for the bearer-authenticated model proxy. One
/// request per optimization run; callers decide what a failure means.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    model: String,
}

impl ProxyClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let endpoint = settings.require_llm_proxy_url()?.to_string();
        let token = settings.require_llm_proxy_token()?.to_string();
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            endpoint,
            token,
            model,
        })
    }

    async fn complete(&self, req: &CompletionRequest) -> anyhow::Result<CompletionResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))?,
        );

        let res = self
            .http
            .post(&self.endpoint)
            .headers(headers)
            .json(req)
            .send()
            .await
            .context("model proxy request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read model proxy response body")?;
        if !status.is_success() {
            return Err(LlmDiagnosticsError {
                client: CLIENT_NAME,
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
            }
            .into());
        }

        serde_json::from_str::<CompletionResponse>(&text)
            .with_context(|| format!("failed to decode model proxy response: {text}"))
    }

    fn system_prompt() -> String {
        [
            "You are a social media posting-time optimizer.",
            "Given a brand profile and a batch of scheduled posts, propose the best posting time for each post.",
            "Return ONLY valid JSON. Do not wrap in markdown. Do not include any extra keys.",
            "No trailing commas. No comments. Use double quotes for all JSON strings. Times are 24-hour HH:MM.",
            "Output schema:",
            "{",
            "  \"recommendations\": [",
            "    {",
            "      \"postId\": \"abc123\",",
            "      \"optimizedTime\": \"18:30\",",
            "      \"confidence\": 85,",
            "      \"reason\": \"short, concrete justification\"",
            "    }",
            "  ],",
            "  \"reasoning\": \"one paragraph summarizing the overall strategy\"",
            "}",
            "Rules:",
            "- postId must be one of the provided post ids, each used at most once",
            "- confidence is an integer between 0 and 100",
            "- keep every post on its scheduled date; only the time of day may change",
            "- suit the time to the post's platform and the brand's audience",
        ]
        .join("\n")
    }

    fn user_prompt(input: &GenerateInput) -> anyhow::Result<String> {
        let summaries: Vec<PostSummary<'_>> = input.posts.iter().map(PostSummary::from).collect();
        let posts_json = serde_json::to_string_pretty(&summaries)
            .context("failed to encode post summaries for the prompt")?;

        Ok(format!(
            "Brand profile:\n- niche: {}\n- industry: {}\n- target audience: {}\n- platforms in this plan: {}\n\nScheduled posts JSON:\n{}",
            input.brand.niche_or_default(),
            input.brand.industry_or_default(),
            input.brand.audience_or_default(),
            input.distinct_platforms().join(", "),
            posts_json,
        ))
    }
}

#[async_trait::async_trait]
impl LlmClient for ProxyClient {
    fn name(&self) -> &'static str {
        CLIENT_NAME
    }

    async fn generate_optimization(
        &self,
        input: GenerateInput,
    ) -> anyhow::Result<ModelOptimization> {
        let req = CompletionRequest {
            model: self.model.clone(),
            temperature: TEMPERATURE,
            messages: vec![
                Message {
                    role: "system",
                    content: Self::system_prompt(),
                },
                Message {
                    role: "user",
                    content: Self::user_prompt(&input)?,
                },
            ],
        };

        let res = self.complete(&req).await?;
        let content = res.content.trim();
        if content.is_empty() {
            return Err(LlmDiagnosticsError {
                client: CLIENT_NAME,
                stage: "content",
                detail: "response content is empty".to_string(),
                raw_output: None,
            }
            .into());
        }

        let (recommendations, reasoning) = match json::parse_optimization(content, &input.posts) {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(LlmDiagnosticsError {
                    client: CLIENT_NAME,
                    stage: "parse",
                    detail: format!("{err:#}"),
                    raw_output: Some(content.to_string()),
                }
                .into())
            }
        };

        Ok(ModelOptimization {
            recommendations,
            reasoning,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest {
    model: String,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Compact view of a post for the prompt; omits body text the model does not
/// need for timing decisions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostSummary<'a> {
    id: &'a str,
    title: &'a str,
    content_type: &'a str,
    platforms: &'a [String],
    date: chrono::NaiveDate,
    time: String,
}

impl<'a> From<&'a Post> for PostSummary<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            id: &post.id,
            title: &post.title,
            content_type: &post.content_type,
            platforms: &post.platforms,
            date: post.date,
            time: crate::domain::timefmt::format_hh_mm(post.time),
        }
    }
}
