//! HTTP service exposing a `TodoStore`.
//!
//! # Design
//! One store behind an `Arc<Mutex<_>>`. Every store call runs on the
//! blocking pool with the lock held for the whole operation, so requests are
//! applied one at a time and snapshot writes never stall an async worker.
//! Store errors and extractor rejections both map to status codes in
//! `ApiError` and carry a `{"error": ...}` body.

pub mod config;

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use todo_core::{CreateTodo, StoreError, Todo, TodoStore, UpdateTodo};
use tokio::net::TcpListener;
use tracing::{error, info};
use uuid::Uuid;

pub use config::Config;

pub type Db = Arc<Mutex<TodoStore>>;

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error on its way out as an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    /// The request never reached the store (bad body, bad path).
    Rejected { status: StatusCode, message: String },
    /// The blocking task running the store call did not finish.
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            other => other.status(),
        };
        Self::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Store(err) => {
                let status = match &err {
                    StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                    StoreError::Persistence(e) => {
                        error!(error = %e, "store persistence failed");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
            ApiError::Rejected { status, message } => (status, message),
            ApiError::Internal(message) => {
                error!(error = %message, "store task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Router over a fresh in-memory store.
pub fn app() -> Router {
    app_with_store(TodoStore::new())
}

pub fn app_with_store(store: TodoStore) -> Router {
    let db: Db = Arc::new(Mutex::new(store));
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/todos/{id}/toggle", post(toggle_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener, store: TodoStore) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        let data_file = store.snapshot().map(|s| s.path().display().to_string());
        info!(%addr, todos = store.len(), data_file = ?data_file, "serving todo API");
    }
    axum::serve(listener, app_with_store(store)).await
}

/// Run `op` against the store on the blocking pool.
async fn with_store<T, F>(db: Db, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut TodoStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        // Every store operation leaves the store consistent, so a poisoned
        // lock is still usable.
        let mut store = db.lock().unwrap_or_else(PoisonError::into_inner);
        op(&mut store)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
    .map_err(ApiError::from)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_todos(State(db): State<Db>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(with_store(db, |store| Ok(store.list())).await?))
}

async fn create_todo(
    State(db): State<Db>,
    input: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(input) = input?;
    let todo = with_store(db, move |store| store.add(input.title, input.detail)).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(db): State<Db>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    Ok(Json(with_store(db, move |store| store.get(id)).await?))
}

async fn update_todo(
    State(db): State<Db>,
    id: Result<Path<Uuid>, PathRejection>,
    input: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    let Json(input) = input?;
    Ok(Json(with_store(db, move |store| store.update(id, input)).await?))
}

async fn toggle_todo(
    State(db): State<Db>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id?;
    Ok(Json(with_store(db, move |store| store.toggle_complete(id)).await?))
}

async fn delete_todo(
    State(db): State<Db>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    with_store(db, move |store| store.remove(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::ValidationError;

    #[test]
    fn validation_maps_to_422() {
        let resp = ApiError::from(StoreError::from(ValidationError::EmptyTitle)).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = ApiError::from(StoreError::NotFound(Uuid::nil())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn rejection_keeps_status() {
        let resp = ApiError::Rejected {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "missing content type".to_string(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn error_body_shape() {
        let body = ErrorBody {
            error: "Title is required!".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Title is required!"}));
    }
}
