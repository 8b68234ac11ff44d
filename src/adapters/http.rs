use crate::core::contact::ContactService;
use crate::core::{ContactSubmission, MailRelay, SubmissionResponse};
use crate::utils::error::{ContactError, ErrorCategory};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub contact: ContactService<dyn MailRelay>,
    /// Directory holding `index.html`, `styles/` and `images/`
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(relay: Arc<dyn MailRelay>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            contact: ContactService::new(relay),
            static_dir: static_dir.into(),
        }
    }
}

/// Builds the full router: API routes, static files, and the `index.html`
/// fallback for every other GET.
pub fn router(state: AppState) -> Router {
    let index = state.static_dir.join("index.html");
    let static_files = ServeDir::new(&state.static_dir).fallback(ServeFile::new(index));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/send-email", post(send_email))
        .route("/health", get(health))
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, ContactError> {
    // 無法解析的 body 視為空白表單，交給必填欄位檢查處理
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            tracing::debug!("Unreadable contact payload: {}", rejection.body_text());
            ContactSubmission::default()
        }
    };

    match state.contact.submit(submission).await {
        Ok(()) => Ok(Json(SubmissionResponse::sent())),
        Err(e) => {
            if e.category() != ErrorCategory::Validation {
                tracing::error!(
                    "❌ Error sending email: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            }
            Err(e)
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
