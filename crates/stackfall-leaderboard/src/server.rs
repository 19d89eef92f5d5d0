//! HTTP API for the leaderboards.
//!
//! | route | |
//! |---|---|
//! | `GET /api/health` | `ok` |
//! | `GET /api/scores/:game` | ranked list as a JSON array |
//! | `POST /api/scores/:game` | submit `{name, score}` or `{name, playerWins, cpuWins, ties}`, returns the updated list |
//!
//! Errors are `{"error": "..."}` with 404 for an unknown game, 400 (plus a
//! `"field"` key) for an invalid payload and 500 for storage failures.

use std::{
    io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    sync::Arc,
};

use axum::{
    Json, Router,
    extract::{Path, Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    cache::StandingsCache,
    client::Leaderboard,
    entry::{GameId, Standings, Submission, UnknownGameError, ValidationError},
    store::StoreError,
};

pub const DEFAULT_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 4321));
pub const ADDR_ENV: &str = "STACKFALL_ADDR";
pub const PORT_ENV: &str = "STACKFALL_PORT";

#[derive(Clone)]
pub struct ApiState {
    board: Arc<dyn Leaderboard>,
    cache: Arc<StandingsCache>,
}

impl ApiState {
    #[must_use]
    pub fn new(board: Arc<dyn Leaderboard>, cache: StandingsCache) -> Self {
        Self {
            board,
            cache: Arc::new(cache),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ApiError {
    UnknownGame(UnknownGameError),
    Invalid(ValidationError),
    #[display("invalid JSON body: {_0}")]
    #[from(ignore)]
    BadBody(String),
    Store(StoreError),
    #[display("storage task failed: {_0}")]
    Task(tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, field) = match &self {
            ApiError::UnknownGame(_) => (StatusCode::NOT_FOUND, "Game not found".to_owned(), None),
            ApiError::Invalid(e) => (StatusCode::BAD_REQUEST, e.to_string(), Some(e.field)),
            ApiError::BadBody(_) => (StatusCode::BAD_REQUEST, self.to_string(), None),
            ApiError::Store(_) | ApiError::Task(_) => {
                eprintln!("leaderboard error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to access scores".to_owned(),
                    None,
                )
            }
        };
        (status, Json(ErrorBody { error, field })).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/scores/:game", get(get_scores).post(post_scores))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(log_request))
}

/// Picks the listen address: explicit, then `STACKFALL_ADDR`, then
/// `STACKFALL_PORT` on localhost, then [`DEFAULT_ADDR`].
///
/// Unparsable environment values are skipped.
pub fn resolve_addr<F>(explicit: Option<SocketAddr>, mut get_env: F) -> SocketAddr
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(addr) = explicit {
        return addr;
    }
    if let Some(addr) = get_env(ADDR_ENV).and_then(|v| v.parse().ok()) {
        return addr;
    }
    if let Some(port) = get_env(PORT_ENV).and_then(|v| v.parse::<u16>().ok()) {
        return SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    }
    DEFAULT_ADDR
}

pub async fn serve(addr: SocketAddr, state: ApiState) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    eprintln!("leaderboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    eprintln!("{method} {uri} -> {}", response.status().as_u16());
    response
}

async fn health() -> &'static str {
    "ok"
}

async fn get_scores(
    State(state): State<ApiState>,
    Path(game): Path<String>,
) -> Result<Json<Standings>, ApiError> {
    let game: GameId = game.parse()?;
    if let Some(standings) = state.cache.get(game) {
        return Ok(Json(standings));
    }
    let board = Arc::clone(&state.board);
    let standings = tokio::task::spawn_blocking(move || board.standings(game)).await??;
    state.cache.put(standings.clone());
    Ok(Json(standings))
}

async fn post_scores(
    State(state): State<ApiState>,
    Path(game): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Standings>, ApiError> {
    let game: GameId = game.parse()?;
    let Json(body) = payload.map_err(|e| ApiError::BadBody(e.body_text()))?;
    let submission = Submission::parse(game, &body)?;

    let board = Arc::clone(&state.board);
    let result = tokio::task::spawn_blocking(move || board.submit(submission)).await;
    state.cache.invalidate(game);
    Ok(Json(result??))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use serde_json::json;
    use tower::ServiceExt as _;

    use super::*;
    use crate::{scratch_dir, store::ScoreStore};

    fn app(label: &str) -> (Router, Arc<ScoreStore>) {
        let store = Arc::new(ScoreStore::new(scratch_dir(label)));
        let state = ApiState::new(store.clone(), StandingsCache::new(Duration::from_secs(60)));
        (router(state), store)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = axum::http::Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header("content-type", "application/json");
        }
        let request = request
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    #[test]
    fn test_resolve_addr_defaults() {
        assert_eq!(resolve_addr(None, |_| None), "127.0.0.1:4321".parse().unwrap());
    }

    #[test]
    fn test_resolve_addr_precedence() {
        let env = |k: &str| match k {
            ADDR_ENV => Some("127.0.0.1:5000".to_owned()),
            PORT_ENV => Some("5001".to_owned()),
            _ => None,
        };
        let explicit: SocketAddr = "0.0.0.0:6000".parse().unwrap();
        assert_eq!(resolve_addr(Some(explicit), env), explicit);
        assert_eq!(resolve_addr(None, env), "127.0.0.1:5000".parse().unwrap());
    }

    #[test]
    fn test_resolve_addr_skips_invalid_addr() {
        let addr = resolve_addr(None, |k| match k {
            ADDR_ENV => Some("not-an-addr".to_owned()),
            PORT_ENV => Some("5002".to_owned()),
            _ => None,
        });
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 5002)));
        let addr = resolve_addr(None, |k| (k == PORT_ENV).then(|| "99999".to_owned()));
        assert_eq!(addr, DEFAULT_ADDR);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app("health");
        assert_eq!(
            call(&app, "GET", "/api/health", None).await,
            (StatusCode::OK, json!("ok"))
        );
    }

    #[tokio::test]
    async fn test_unknown_game_is_404() {
        let (app, _) = app("unknown");
        let (status, body) = call(&app, "GET", "/api/scores/chess", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Game not found"}));

        let (status, _) = call(&app, "POST", "/api/scores/chess", Some(r#"{"name":"a","score":1}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let (app, _) = app("submit");
        let (status, body) = call(&app, "GET", "/api/scores/tetris", None).await;
        assert_eq!((status, body), (StatusCode::OK, json!([])));

        let (status, body) = call(
            &app,
            "POST",
            "/api/scores/tetris",
            Some(r#"{"name":"  ada  ","score":900}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"name": "ada", "score": 900}]));

        // The write invalidated the cached empty list.
        let (_, body) = call(&app, "GET", "/api/scores/tetris", None).await;
        assert_eq!(body, json!([{"name": "ada", "score": 900}]));
    }

    #[tokio::test]
    async fn test_rps_submission() {
        let (app, _) = app("rps-api");
        let (status, body) = call(
            &app,
            "POST",
            "/api/scores/rps",
            Some(r#"{"name":"bo","playerWins":4,"cpuWins":1,"ties":2}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{"name": "bo", "netScore": 3, "playerWins": 4, "cpuWins": 1, "ties": 2}])
        );
    }

    #[tokio::test]
    async fn test_invalid_payload_names_field() {
        let (app, store) = app("invalid");
        let (status, body) = call(
            &app,
            "POST",
            "/api/scores/tetris",
            Some(r#"{"name":"ada","score":"lots"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], json!("score"));
        assert!(body["error"].is_string());
        assert!(store.standings(GameId::Tetris).unwrap().is_empty());

        let (status, body) = call(&app, "POST", "/api/scores/tetris", Some("{oops")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("field").is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let dir = scratch_dir("blocked");
        std::fs::create_dir_all(dir.parent().unwrap()).unwrap();
        // A file where the directory should be makes every write fail.
        std::fs::write(&dir, "").unwrap();
        let store = Arc::new(ScoreStore::new(&dir));
        let app = router(ApiState::new(store, StandingsCache::new(Duration::ZERO)));

        let (status, body) = call(
            &app,
            "POST",
            "/api/scores/tetris",
            Some(r#"{"name":"ada","score":1}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to access scores"}));
    }
}
