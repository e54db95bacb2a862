use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use primetime_core::domain::post::{BrandProfile, Post};
use primetime_core::domain::timefmt;
use primetime_core::heuristics;
use primetime_core::llm::proxy::ProxyClient;
use primetime_core::llm::LlmClient;
use primetime_core::optimizer;
use primetime_core::report::{self, OptimizationReport};

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

    let llm: Option<Arc<ProxyClient>> = match ProxyClient::from_settings(&settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(
                error = %e,
                "model proxy not configured; starting API in degraded (fallback-only) mode"
            );
            None
        }
    };

    let state = AppState {
        llm,
        min_gap_minutes: settings.min_gap_minutes_or_default(),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/optimize", post(optimize))
        .route("/slots/:platform", get(get_platform_slots))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    llm: Option<Arc<ProxyClient>>,
    min_gap_minutes: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeRequest {
    #[serde(default)]
    brand_profile: BrandProfile,
    posts: Vec<Post>,
    #[serde(default)]
    min_gap_minutes: Option<u32>,
}

async fn optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizationReport>, (StatusCode, Json<serde_json::Value>)> {
    let llm = state.llm.as_deref().map(|client| client as &dyn LlmClient);
    let outcome = optimizer::generate_optimal_times(&req.brand_profile, &req.posts, llm)
        .await
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        })?;

    let min_gap_minutes = req.min_gap_minutes.unwrap_or(state.min_gap_minutes);
    let report = report::build_report(outcome, &req.posts, min_gap_minutes);

    tracing::info!(
        run_id = %report.run_id,
        source = report.source.label(),
        total = report.summary.total,
        changed = report.summary.changed,
        "optimization run complete"
    );

    Ok(Json(report))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiPlatformSlots {
    platform: &'static str,
    slots: Vec<ApiSlot>,
    best_days: Vec<&'static str>,
    tip: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiSlot {
    time: String,
    label: &'static str,
    score: u8,
}

async fn get_platform_slots(Path(platform): Path<String>) -> Json<ApiPlatformSlots> {
    let table = heuristics::best_times_for(&platform);
    Json(ApiPlatformSlots {
        platform: table.platform,
        slots: table
            .slots
            .iter()
            .map(|slot| ApiSlot {
                time: timefmt::format_hh_mm(slot.time),
                label: slot.label,
                score: slot.score,
            })
            .collect(),
        best_days: table.best_days,
        tip: table.tip,
    })
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
