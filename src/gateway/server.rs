use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::analyzer;
use crate::config::MelingoConfig;
use crate::engine::DecisionEngine;
use crate::error::{ApiError, StoreError};
use crate::store::SessionStore;
use crate::types::{AnalyzeRequest, Decision, TrackingEvent};

pub struct AppState {
    /// One write lock per `/track` keeps get-or-create plus append atomic.
    pub store: RwLock<SessionStore>,
    pub engine: DecisionEngine,
}

impl AppState {
    pub fn new(engine: DecisionEngine) -> Self {
        Self {
            store: RwLock::new(SessionStore::new()),
            engine,
        }
    }
}

pub async fn run(config: MelingoConfig) -> anyhow::Result<()> {
    let engine = DecisionEngine::from_config(&config.engine)?;
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let state = Arc::new(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let base = format!("http://{addr}");

    info!("melingo engagement API listening on {addr}");
    info!("health check: {base}/health");
    info!("track endpoint: {base}/track");
    info!("analyze endpoint: {base}/analyze");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// Build the axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/track", post(track))
        .route("/analyze", post(analyze))
        // The widget is embedded on arbitrary shop domains.
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// `POST /track`: record one event.
///
/// Malformed bodies get 400 with `{"error": ...}`. Clients should read the
/// body rather than branch on the status alone.
async fn track(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let event: TrackingEvent = serde_json::from_slice(&body).inspect_err(|e| {
        warn!("rejected track payload: {e}");
    })?;

    let session_id = event.session_id.clone();
    let event_type = event.event_type.clone();

    let total = {
        let mut store = state.store.write().await;
        store.record(event).events.len()
    };

    info!(session = %session_id, event = %event_type, total, "tracked event");

    Ok(Json(serde_json::json!({
        "status": "success",
        "session_id": session_id,
    })))
}

/// `POST /analyze`: decide for a tracked session.
///
/// Unknown sessions get 404 and malformed bodies 400, both with
/// `{"error": ...}`. A failure inside analysis still answers 200 with
/// [`Decision::safe_default`].
async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Decision>, ApiError> {
    let request: AnalyzeRequest = serde_json::from_slice(&body).inspect_err(|e| {
        warn!("rejected analyze payload: {e}");
    })?;

    // Run on its own task so a panic anywhere in analysis degrades to the
    // safe default instead of dropping the connection.
    let task_state = Arc::clone(&state);
    let task = tokio::spawn(async move { decide_for(&task_state, &request.session_id).await });

    match task.await {
        Ok(result) => Ok(Json(result?)),
        Err(e) => {
            warn!("analysis failed, returning safe default: {e}");
            Ok(Json(Decision::safe_default()))
        }
    }
}

/// Summarize a stored session and run the decision engine on it.
pub async fn decide_for(state: &AppState, session_id: &str) -> Result<Decision, StoreError> {
    let summary = {
        let store = state.store.read().await;
        let session = store.get(session_id)?;
        info!(session = %session_id, events = session.events.len(), "analyzing session");
        analyzer::summarize(&session.events)
    };

    let decision = state.engine.decide(&summary).await;
    info!(
        session = %session_id,
        show = decision.should_show_message,
        trigger = decision.trigger_type.map_or("none", |t| t.as_str()),
        "decision made"
    );
    Ok(decision)
}
