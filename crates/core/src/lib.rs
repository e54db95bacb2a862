pub mod domain;
pub mod heuristics;
pub mod llm;
pub mod optimizer;
pub mod relay;
pub mod report;
pub mod resolver;
pub mod summary;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub llm_proxy_url: Option<String>,
        pub llm_proxy_token: Option<String>,
        pub relay_webhook_url: Option<String>,
        pub sentry_dsn: Option<String>,
        pub min_gap_minutes: Option<u32>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                llm_proxy_url: std::env::var("LLM_PROXY_URL").ok(),
                llm_proxy_token: std::env::var("LLM_PROXY_TOKEN").ok(),
                relay_webhook_url: std::env::var("RELAY_WEBHOOK_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                min_gap_minutes: std::env::var("MIN_GAP_MINUTES")
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok()),
            })
        }

        pub fn require_llm_proxy_url(&self) -> anyhow::Result<&str> {
            self.llm_proxy_url
                .as_deref()
                .context("LLM_PROXY_URL is required")
        }

        pub fn require_llm_proxy_token(&self) -> anyhow::Result<&str> {
            self.llm_proxy_token
                .as_deref()
                .context("LLM_PROXY_TOKEN is required")
        }

        pub fn min_gap_minutes_or_default(&self) -> u32 {
            self.min_gap_minutes
                .unwrap_or(crate::resolver::DEFAULT_MIN_GAP_MINUTES)
        }
    }
}
