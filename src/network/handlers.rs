//! HTTP handlers
//!
//! Translate REST calls into store commands. Every failure becomes a 500
//! with `{"error": <message>}`; the error kind is only visible in the logs.

use std::string::FromUtf8Error;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use serde::Serialize;
use tokio::task::JoinError;

use crate::command::Command;
use crate::engine::KvStore;
use crate::error::KvError;

/// Content type of every JSON response
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Content type of a raw GET value
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build the router for a store
///
/// Request bodies are not capped: a value is stored whatever its size.
pub fn router(store: Arc<KvStore>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route(
            "/key/:key",
            get(handle_get).post(handle_set).delete(handle_delete),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(Extension(store))
}

#[derive(Serialize)]
struct StatusBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors surfaced by the handlers
#[derive(Debug)]
pub enum ApiError {
    Store(KvError),
    InvalidBody(FromUtf8Error),
    Task(JoinError),
}

impl From<KvError> for ApiError {
    fn from(err: KvError) -> Self {
        ApiError::Store(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Store(e) => write!(f, "{}", e),
            ApiError::InvalidBody(e) => write!(f, "request body is not UTF-8: {}", e),
            ApiError::Task(e) => write!(f, "store task failed: {}", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) => tracing::error!("Store error ({:?}): {}", e.kind(), e),
            ApiError::InvalidBody(_) => tracing::warn!("Rejected request: {}", self),
            ApiError::Task(_) => tracing::error!("{}", self),
        }

        json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ErrorBody {
                error: self.to_string(),
            },
        )
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn success() -> Response {
    json_response(StatusCode::OK, &StatusBody { status: "success" })
}

/// Run a command on the blocking pool; the store does synchronous file I/O
async fn run_command(store: Arc<KvStore>, command: Command) -> Result<Option<String>, ApiError> {
    tracing::debug!("{} request", command.name());
    let result = tokio::task::spawn_blocking(move || store.execute(command))
        .await
        .map_err(ApiError::Task)?;
    Ok(result?)
}

async fn handle_root() -> Response {
    json_response(StatusCode::OK, &serde_json::json!({ "key": "value" }))
}

async fn handle_get(
    Extension(store): Extension<Arc<KvStore>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let value = run_command(store, Command::Get { key })
        .await?
        .unwrap_or_default();

    Ok(([(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)], value).into_response())
}

async fn handle_set(
    Extension(store): Extension<Arc<KvStore>>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let value = String::from_utf8(body.to_vec()).map_err(ApiError::InvalidBody)?;
    run_command(store, Command::Set { key, value }).await?;
    Ok(success())
}

async fn handle_delete(
    Extension(store): Extension<Arc<KvStore>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    run_command(store, Command::Delete { key }).await?;
    Ok(success())
}
