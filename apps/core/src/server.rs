//! HTTP delivery shell.
//!
//! Thin axum layer over the coordinator's `generate_response` contract.
//! The pipeline itself is synchronous, in-memory and immutable after
//! startup; only the session store and rate limiter are mutable state.

use crate::brain::Coordinator;
use crate::config::AppConfig;
use crate::models::{ChatMessage, ChatRequest, ChatResponse, HealthResponse};
use crate::rate_limiter::RateLimiter;
use crate::session::SessionStore;
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const EMPTY_MESSAGE_REPLY: &str = "Please enter a message.";
const RATE_LIMITED_REPLY: &str =
    "You're sending messages a little too quickly. Please wait a moment and try again.";

/// Application state shared across handlers.
pub struct AppState {
    pub coordinator: Coordinator,
    pub sessions: SessionStore,
    pub rate_limiter: Mutex<RateLimiter>,
}

impl AppState {
    pub fn new(coordinator: Coordinator, config: &AppConfig) -> Self {
        Self {
            coordinator,
            sessions: SessionStore::new(),
            rate_limiter: Mutex::new(RateLimiter::new(
                config.rate_limit,
                Duration::from_secs(config.rate_window_secs),
            )),
        }
    }
}

type AppStateArc = Arc<AppState>;

pub fn router(state: AppStateArc) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/session/:id/messages", get(session_messages))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
pub async fn run(state: AppState, bind_addr: &str) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn chat(
    State(state): State<AppStateArc>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    request
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    // Blank input gets a canned reply without touching the pipeline.
    let message = request.message.trim();
    if message.is_empty() {
        return Ok(Json(ChatResponse {
            response: EMPTY_MESSAGE_REPLY.to_string(),
            session_id,
        }));
    }

    if !state.rate_limiter.lock().await.check(session_id) {
        return Err((StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_REPLY.to_string()));
    }

    state.sessions.append(session_id, "user", message).await;
    let response = state.coordinator.generate_response(message);
    state.sessions.append(session_id, "assistant", &response).await;

    Ok(Json(ChatResponse {
        response,
        session_id,
    }))
}

pub async fn session_messages(
    State(state): State<AppStateArc>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, (StatusCode, String)> {
    match state.sessions.messages(session_id).await {
        Some(messages) => Ok(Json(messages)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("Unknown session: {}", session_id),
        )),
    }
}

pub async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let knowledge = state.coordinator.knowledge();
    Json(HealthResponse {
        status: "ok".to_string(),
        knowledge_loaded: knowledge.is_loaded(),
        diseases: knowledge.len(),
        model_loaded: state.coordinator.symptoms().is_loaded(),
    })
}
