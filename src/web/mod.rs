//! HTTP API for the game front end.
//!
//! JSON over axum. All routes live under `/api`; anything else falls through
//! to the configured static directory when one is set.
//!
//! | Method | Path                 | Result                         |
//! |--------|----------------------|--------------------------------|
//! | GET    | `/api/health`        | `{"status":"ok"}`              |
//! | POST   | `/api/games`         | 201 + saved game               |
//! | GET    | `/api/games`         | `{total, items}` page          |
//! | GET    | `/api/games/:id`     | game or 404                    |
//! | POST   | `/api/runs`          | 201 + scored run               |
//! | GET    | `/api/runs`          | `{total, items}`               |
//! | GET    | `/api/highscores`    | `{items}` ranked runs          |
//! | GET    | `/api/export/json`   | whole database                 |
//!
//! Errors are `{"error": "..."}` with 400, 404 or 500.
//!
//! This module is only available with the `web` feature.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::GameConfig;
use crate::error::{TourError, TourResult};
use crate::store::{GameBackend, JsonStore, NewGame, RunSubmission, Scope};

/// Shared state for request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<JsonStore>,
    games_limit: usize,
    score_limit: usize,
}

impl AppState {
    /// Wrap a store with the scoreboard defaults from `config`.
    #[must_use]
    pub fn new(store: JsonStore, config: &GameConfig) -> Self {
        Self {
            store: Arc::new(store),
            games_limit: config.scoreboard.games_limit,
            score_limit: config.scoreboard.limit,
        }
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &JsonStore {
        &self.store
    }
}

/// API routes bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/games", get(list_games).post(create_game))
        .route("/api/games/:id", get(get_game))
        .route("/api/runs", get(list_runs).post(submit_run))
        .route("/api/highscores", get(highscores))
        .route("/api/export/json", get(export_json))
        .with_state(state)
}

/// Full application: API routes, optional static front end, permissive CORS.
pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = router(state);
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(CorsLayer::permissive())
}

/// Open the store and serve until the process is stopped.
///
/// # Errors
///
/// Returns error if the store cannot be opened or the address cannot be
/// bound.
pub async fn serve(config: GameConfig) -> TourResult<()> {
    let store = JsonStore::from_config(&config)?;
    let db_path = store.path().display().to_string();
    let state = AppState::new(store, &config);
    let app = app(state, config.server.static_dir.as_deref());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(event = "server_started", addr = %addr, db = %db_path);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Error response wrapper.
#[derive(Debug)]
pub struct ApiError(TourError);

impl From<TourError> for ApiError {
    fn from(err: TourError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TourError::NotFound { .. } => StatusCode::NOT_FOUND,
            err if err.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(event = "request_failed", error = %self.0);
        }
        let body = match &self.0 {
            TourError::MissingFields(fields) => json!({"error": "missing fields", "fields": fields}),
            err => json!({"error": err.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Decode a body regardless of its content type.
fn json_body<T: DeserializeOwned>(body: &Bytes) -> TourResult<T> {
    serde_json::from_slice(body).map_err(|e| TourError::invalid_request(format!("invalid JSON body: {e}")))
}

fn usize_param(
    params: &HashMap<String, String>,
    key: &str,
    default: usize,
    message: &str,
) -> TourResult<usize> {
    params.get(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|_| TourError::invalid_request(message))
    })
}

/// Health check handler.
async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Run a store call on the blocking pool; file I/O and the store lock stay
/// off the async workers.
async fn with_store<T, F>(state: &AppState, call: F) -> TourResult<T>
where
    T: Send + 'static,
    F: FnOnce(&JsonStore) -> TourResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || call(&store))
        .await
        .map_err(|e| TourError::io(format!("store task failed: {e}")))?
}

async fn create_game(State(state): State<AppState>, body: Bytes) -> ApiResult<impl IntoResponse> {
    let request: NewGame = json_body(&body)?;
    let game = with_store(&state, move |store| store.save_game(request)).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

async fn list_games(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    const MESSAGE: &str = "limit/offset must be int";
    let limit = usize_param(&params, "limit", state.games_limit, MESSAGE)?;
    let offset = usize_param(&params, "offset", 0, MESSAGE)?;
    let page = with_store(&state, move |store| store.list_games(limit, offset)).await?;
    Ok(Json(page))
}

async fn get_game(State(state): State<AppState>, UrlPath(id): UrlPath<String>) -> ApiResult<impl IntoResponse> {
    let game = with_store(&state, move |store| store.get_game(&id)).await?;
    Ok(Json(game))
}

async fn submit_run(State(state): State<AppState>, body: Bytes) -> ApiResult<impl IntoResponse> {
    let request = RunSubmission::from_json(json_body(&body)?)?;
    let run = with_store(&state, move |store| store.submit_run(request)).await?;
    Ok((StatusCode::CREATED, Json(run)))
}

async fn list_runs(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let page = with_store(&state, move |store| {
        store.list_runs(
            params.get("game_id").map(String::as_str),
            params.get("agent_type").map(String::as_str),
        )
    })
    .await?;
    Ok(Json(page))
}

async fn highscores(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let scope = Scope::from_query(params.get("scope").map(String::as_str));
    let limit = usize_param(&params, "limit", state.score_limit, "limit must be int")?;
    let items = with_store(&state, move |store| {
        store.highscores(scope, params.get("agent_type").map(String::as_str), limit)
    })
    .await?;
    Ok(Json(json!({ "items": items })))
}

async fn export_json(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let db = with_store(&state, JsonStore::export).await?;
    Ok(Json(db))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state() -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::builder().store_path(dir.path().join("db.json")).build();
        let store = JsonStore::from_config(&config).unwrap();
        (dir, AppState::new(store, &config))
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = body.map_or_else(Body::empty, |v| Body::from(v.to_string()));
        let request = Request::builder().method(method).uri(uri).body(body).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[test]
    fn test_api_error_status() {
        let missing = ApiError(TourError::not_found("game", "x"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        let bad = ApiError(TourError::MissingFields(vec!["route".to_string()]));
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        let internal = ApiError(TourError::io("disk"));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn test_failed_store_task_is_500() {
        let (_dir, state) = test_state();
        let err = with_store(&state, |_| -> TourResult<()> { panic!("store call died") })
            .await
            .unwrap_err();
        assert!(matches!(err, TourError::Io(_)));
        assert_eq!(ApiError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_all_persist() {
        let (_dir, state) = test_state();
        let cities = json!([
            {"id": "A", "x": 0.0, "y": 0.0},
            {"id": "B", "x": 3.0, "y": 0.0},
            {"id": "C", "x": 3.0, "y": 4.0}
        ]);
        let (_, game) = call(router(state.clone()), "POST", "/api/games", Some(json!({"cities": cities}))).await;
        let game_id = game["id"].as_str().unwrap().to_string();

        let mut tasks = Vec::new();
        for n in 0..16 {
            let app = router(state.clone());
            let run = json!({
                "game_id": game_id, "player_name": format!("p{n}"), "agent_type": "human",
                "distance": 12.0, "route": ["A", "B", "C", "A"]
            });
            tasks.push(tokio::spawn(async move { call(app, "POST", "/api/runs", Some(run)).await.0 }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::CREATED);
        }

        let (_, runs) = call(router(state), "GET", "/api/runs", None).await;
        assert_eq!(runs["total"], 16);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let (_dir, state) = test_state();
        let (status, body) = call(router(state), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_create_game_too_few_cities() {
        let (_dir, state) = test_state();
        let body = json!({"name": "tiny", "cities": [{"id": "A", "x": 0, "y": 0}]});
        let (status, value) = call(router(state), "POST", "/api/games", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].as_str().unwrap().contains("at least 3"));
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let (_dir, state) = test_state();
        let request = Request::builder()
            .method("POST")
            .uri("/api/runs")
            .body(Body::from("{oops"))
            .unwrap();
        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_run_fields_listed() {
        let (_dir, state) = test_state();
        let (status, value) = call(router(state), "POST", "/api/runs", Some(json!({"game_id": "g"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "missing fields");
        assert_eq!(value["fields"], json!(["player_name", "agent_type", "distance", "route"]));
    }

    #[tokio::test]
    async fn test_unknown_game_is_404() {
        let (_dir, state) = test_state();
        let (status, value) = call(router(state.clone()), "GET", "/api/games/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(value["error"].is_string());

        let run = json!({
            "game_id": "nope", "player_name": "p", "agent_type": "human",
            "distance": 1.0, "route": ["A"]
        });
        let (status, _) = call(router(state), "POST", "/api/runs", Some(run)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_paging_params() {
        let (_dir, state) = test_state();
        let (status, value) = call(router(state.clone()), "GET", "/api/games?limit=ten", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "invalid request: limit/offset must be int");

        let (status, _) = call(router(state), "GET", "/api/highscores?limit=-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_listings() {
        let (_dir, state) = test_state();
        let (_, games) = call(router(state.clone()), "GET", "/api/games", None).await;
        assert_eq!(games, json!({"total": 0, "items": []}));
        let (_, scores) = call(router(state.clone()), "GET", "/api/highscores", None).await;
        assert_eq!(scores, json!({"items": []}));
        let (_, export) = call(router(state), "GET", "/api/export/json", None).await;
        assert_eq!(export, json!({"games": [], "runs": []}));
    }
}
