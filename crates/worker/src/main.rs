use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use primetime_core::domain::post::{BrandProfile, Post};
use primetime_core::llm::proxy::ProxyClient;
use primetime_core::llm::LlmClient;
use primetime_core::relay::RelayClient;

#[derive(Debug, Parser)]
#[command(name = "primetime_worker")]
struct Args {
    /// Path to the plan file: JSON {"brandProfile": ..., "posts": [...]}.
    #[arg(long)]
    plan: std::path::PathBuf,

    /// Minimum spacing between same-day posts. Overrides MIN_GAP_MINUTES.
    #[arg(long)]
    min_gap_minutes: Option<u32>,

    /// Skip the model call and use the heuristic tables directly.
    #[arg(long)]
    offline: bool,

    /// Do everything except publishing to the relay webhook.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanFile {
    #[serde(default)]
    brand_profile: BrandProfile,
    posts: Vec<Post>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = primetime_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let plan = read_plan(&args.plan)?;

    let llm = if args.offline {
        tracing::info!("offline run; model path skipped");
        None
    } else {
        match ProxyClient::from_settings(&settings) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(error = %err, "model proxy not configured; using heuristic tables");
                None
            }
        }
    };

    let outcome = primetime_core::optimizer::generate_optimal_times(
        &plan.brand_profile,
        &plan.posts,
        llm.as_ref().map(|client| client as &dyn LlmClient),
    )
    .await?;

    let min_gap_minutes = args
        .min_gap_minutes
        .unwrap_or_else(|| settings.min_gap_minutes_or_default());
    let report = primetime_core::report::build_report(outcome, &plan.posts, min_gap_minutes);

    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!(
        run_id = %report.run_id,
        source = report.source.label(),
        total = report.summary.total,
        changed = report.summary.changed,
        avg_confidence = report.summary.avg_confidence,
        "optimization run complete"
    );

    if args.dry_run {
        tracing::info!(dry_run = true, "relay skipped");
        return Ok(());
    }

    match RelayClient::from_settings(&settings)? {
        Some(relay) => {
            if let Err(err) = relay.publish(&report).await {
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "relay publish failed");
            }
        }
        None => {
            tracing::info!("no relay webhook configured; report printed only");
        }
    }

    Ok(())
}

fn read_plan(path: &std::path::Path) -> anyhow::Result<PlanFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("plan file is not valid JSON: {}", path.display()))
}

fn init_sentry(settings: &primetime_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
