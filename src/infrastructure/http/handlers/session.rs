//! Session Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CloseSessionCommand, CreateSessionCommand};
use crate::infrastructure::http::dto::{ApiResponse, SessionRequest, SessionResponseDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 创建配装会话
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let result = state
        .create_session_handler
        .handle(CreateSessionCommand)
        .await?;

    Ok(Json(ApiResponse::success(SessionResponseDto {
        session_id: result.session_id,
    })))
}

/// 关闭会话
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let cmd = CloseSessionCommand {
        session_id: req.session_id,
    };

    let result = state.close_session_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(SessionResponseDto {
        session_id: result.session_id,
    })))
}
