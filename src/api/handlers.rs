//! HTTP request handlers

use super::types::{CallbackRequest, CommandsResponse, ErrorResponse, RepliesResponse, TextRequest};
use super::AppState;
use crate::i18n::COMMAND_MENU;
use crate::runtime::Inbound;
use crate::session::UserId;
use crate::state_machine::{Command, Event};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Inbound chat traffic
        .route("/api/users/:user_id/commands/:command", post(run_command))
        .route("/api/users/:user_id/messages", post(send_text))
        .route("/api/users/:user_id/callbacks", post(press_button))
        // Command menu for the transport
        .route("/api/commands", get(list_commands))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Inbound Chat Traffic
// ============================================================

async fn run_command(
    State(state): State<AppState>,
    Path((user_id, command)): Path<(String, String)>,
) -> Result<Json<RepliesResponse>, AppError> {
    let command: Command = command
        .parse()
        .map_err(|e| AppError::BadRequest(format!("{e}")))?;
    dispatch(&state, user_id, Event::from(command)).await
}

async fn send_text(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<TextRequest>,
) -> Result<Json<RepliesResponse>, AppError> {
    dispatch(&state, user_id, Event::Text { text: req.text }).await
}

async fn press_button(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<CallbackRequest>,
) -> Result<Json<RepliesResponse>, AppError> {
    dispatch(
        &state,
        user_id,
        Inbound::Callback {
            payload: req.payload,
        },
    )
    .await
}

async fn dispatch(
    state: &AppState,
    user_id: String,
    inbound: impl Into<Inbound>,
) -> Result<Json<RepliesResponse>, AppError> {
    let user_id = UserId::new(user_id);
    let replies = state
        .runtime
        .dispatch(&user_id, inbound)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %user_id, error = %e, "Dispatch failed");
            AppError::Internal(e)
        })?;
    Ok(Json(RepliesResponse { replies }))
}

// ============================================================
// Metadata
// ============================================================

async fn list_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: COMMAND_MENU.to_vec(),
    })
}

async fn get_version() -> &'static str {
    concat!("flight_desk ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
