//! JSON API over the scoring engine.
//!
//! - `GET  /` - service banner
//! - `POST /api/tasks/analyze/` - score, rank and check a task list
//! - `GET  /api/tasks/suggest/` - top tasks to work on today
//! - `GET  /api/tasks/health/` - liveness probe
//!
//! Every request builds its own `Scorer`; the shared state is read-only.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::info;

use taskrank_core::intake::is_falsy;
use taskrank_core::{analyze, normalize_tasks, suggest, Analysis, IntakeError, ScoredTask, Scorer, Strategy};

use crate::config::Config;

pub struct AppState {
    pub default_strategy: Strategy,
    pub timezone: Tz,
    pub suggest_limit: usize,
    /// Fixed "today" for every request; `None` follows the clock.
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            default_strategy: cfg.scoring.default_strategy,
            timezone: cfg.timezone()?,
            suggest_limit: cfg.scoring.suggest_limit,
            today: None,
        })
    }

    /// Absent names use the configured default; unknown names score as
    /// `smart_balance`.
    fn scorer(&self, strategy: Option<&str>) -> Scorer {
        let strategy = match strategy {
            Some(name) => Strategy::resolve(Some(name)),
            None => self.default_strategy,
        };
        let today = self
            .today
            .unwrap_or_else(|| taskrank_core::time::today_in(self.timezone));
        Scorer::new(strategy).with_today(today)
    }
}

/// Error body `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, msg.into())
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    strategy: Option<String>,
    /// JSON-encoded task list.
    tasks: Option<String>,
}

#[derive(Debug, Serialize)]
struct SuggestResponse {
    strategy: Strategy,
    top_tasks: Vec<ScoredTask>,
    count: usize,
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "taskrank backend is running.",
        "api_base": "/api/tasks/",
        "health": "/api/tasks/health/",
        "version": env!("CARGO_PKG_VERSION"),
        "build": env!("TASKRANK_BUILD_SHA"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Body: `{"tasks": [...], "strategy": "..."}`. A `strategy` that is not a
/// string scores as `smart_balance`.
async fn analyze_tasks(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Analysis>, ApiError> {
    let doc = parse_body(&body)?;
    let tasks = match normalize_tasks(doc.get("tasks").unwrap_or(&Value::Null)) {
        Ok(tasks) => tasks,
        Err(IntakeError::NotAList) => return Err(IntakeError::NoTasks.into()),
        Err(e) => return Err(e.into()),
    };

    let strategy = doc.get("strategy").map(|v| v.as_str().unwrap_or_default());
    let scorer = state.scorer(strategy);
    info!(tasks = tasks.len(), strategy = %scorer.strategy(), "analyze request");
    Ok(Json(analyze(&scorer, &tasks)))
}

/// Tasks come from the JSON body (`{"tasks": [...]}`) or, failing that, from
/// the `tasks` query parameter as a JSON string.
async fn suggest_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestParams>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let from_body = parse_body(&body)?
        .get("tasks")
        .cloned()
        .filter(|v| !is_falsy(v));

    let raw_tasks = match (from_body, params.tasks.as_deref()) {
        (Some(tasks), _) => tasks,
        (None, Some(encoded)) if !encoded.is_empty() => {
            serde_json::from_str(encoded).map_err(IntakeError::from)?
        }
        _ => Value::Null,
    };

    let tasks = match normalize_tasks(&raw_tasks) {
        Ok(tasks) => tasks,
        Err(IntakeError::NoTasks) => {
            return Ok(Json(json!({
                "top_tasks": [],
                "message": "No tasks provided - please analyze tasks first or provide a task list.",
            }))
            .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let scorer = state.scorer(params.strategy.as_deref());
    info!(tasks = tasks.len(), strategy = %scorer.strategy(), "suggest request");
    let top_tasks = suggest(&scorer, &tasks, state.suggest_limit);

    Ok(Json(SuggestResponse {
        strategy: scorer.strategy(),
        count: top_tasks.len(),
        top_tasks,
    })
    .into_response())
}

/// An empty body reads as JSON null.
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body).map_err(IntakeError::from)?)
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/tasks/analyze/", post(analyze_tasks))
        .route("/api/tasks/suggest/", get(suggest_tasks))
        .route("/api/tasks/health/", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "taskrank server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("taskrank server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
