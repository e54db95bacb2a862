use anyhow::Context;
use std::time::Duration;

use crate::config::Settings;
use crate::report::OptimizationReport;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Posts finished reports to the downstream automation webhook. Optional:
/// when no webhook is configured the engine simply keeps its output local.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    webhook_url: String,
}

impl RelayClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Option<Self>> {
        let Some(webhook_url) = settings.relay_webhook_url.clone() else {
            return Ok(None);
        };

        let timeout_secs = std::env::var("RELAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Some(Self { http, webhook_url }))
    }

    /// Single attempt; the caller decides whether a relay failure matters.
    pub async fn publish(&self, report: &OptimizationReport) -> anyhow::Result<()> {
        let res = self
            .http
            .post(&self.webhook_url)
            .json(report)
            .send()
            .await
            .context("relay webhook request failed")?;

        let status = res.status();
        anyhow::ensure!(status.is_success(), "relay webhook returned status={status}");

        tracing::info!(run_id = %report.run_id, "published optimization report to relay webhook");
        Ok(())
    }
}
