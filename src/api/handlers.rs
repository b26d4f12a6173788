//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatResponse, CreateChatResponse, ErrorResponse, NameRequest, OptionRequest, QueuedResponse,
    SuccessResponse,
};
use super::AppState;
use crate::analytics::AnalyticsSummary;
use crate::runtime::{ChatEvent, SessionError};
use crate::state_machine::{ChatOption, Event};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization, UserAgent},
    TypedHeader,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Chat lifecycle
        .route("/api/chats", post(create_chat))
        .route("/api/chats/:id", get(get_chat).delete(delete_chat))
        // SSE streaming
        .route("/api/chats/:id/stream", get(stream_chat))
        // Visitor actions
        .route("/api/chats/:id/options", post(select_option))
        .route("/api/chats/:id/name", post(submit_name))
        .route("/api/chats/:id/payment-click", post(payment_click))
        // Funnel summary
        .route("/api/admin/summary", get(admin_summary))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat Lifecycle
// ============================================================

async fn create_chat(
    State(state): State<AppState>,
    user_agent: Option<TypedHeader<UserAgent>>,
) -> (StatusCode, Json<CreateChatResponse>) {
    let user_agent = user_agent.as_ref().map(|TypedHeader(ua)| ua.as_str());
    let session_id = state.runtime.create_session(user_agent).await;
    (StatusCode::CREATED, Json(CreateChatResponse { session_id }))
}

async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChatResponse>, AppError> {
    let chat = state.runtime.snapshot(&id).await?;
    Ok(Json(ChatResponse { chat }))
}

async fn stream_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (snapshot, broadcast_rx) = state.runtime.subscribe(&id).await?;
    Ok(sse_stream(ChatEvent::Init { snapshot }, broadcast_rx))
}

async fn delete_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.runtime.teardown(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Visitor Actions
// ============================================================

async fn select_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<OptionRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    let option = ChatOption::from_label(&req.label)
        .ok_or_else(|| AppError::Unprocessable(format!("Unknown option: {}", req.label)))?;
    queue(&state, &id, Event::option(option)).await
}

async fn submit_name(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NameRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    queue(&state, &id, Event::name(req.text)).await
}

async fn payment_click(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    queue(&state, &id, Event::PaymentClicked).await
}

/// Hand an event to the chat task. The outcome arrives over SSE.
async fn queue(
    state: &AppState,
    id: &str,
    event: Event,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    state.runtime.send_event(id, event).await?;
    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

// ============================================================
// Admin
// ============================================================

async fn admin_summary(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(AppError::NotFound("Not found".to_string()));
    };

    let authorized = bearer.is_some_and(|TypedHeader(auth)| auth.token() == expected);
    if !authorized {
        return Err(AppError::Unauthorized("Invalid admin token".to_string()));
    }

    let sessions = state
        .runtime
        .db()
        .list_sessions()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(AnalyticsSummary::from_sessions(&sessions)))
}

async fn get_version() -> &'static str {
    concat!("luna-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Unprocessable(String),
    Gone(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
            SessionError::Stopped(_) => AppError::Gone(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Gone(msg) => (StatusCode::GONE, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
