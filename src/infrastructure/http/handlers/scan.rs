//! Scan Handlers - 截图上传、识别、状态

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{
    ClearImagesCommand, ClearMessagesCommand, DeleteImageCommand, GetScanStatus, ImageUpload,
    ProcessImagesCommand, UploadImagesCommand,
};
use crate::domain::ingestion::{GateState, ImageStatus};
use crate::domain::recognition::AnalysisKind;
use crate::infrastructure::http::dto::{ApiResponse, Empty, SessionRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub image_ids: Vec<String>,
    pub rejected: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponseDto {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    pub session_id: String,
    pub image_id: String,
}

#[derive(Debug, Serialize)]
pub struct ClearResponseDto {
    pub removed: usize,
}

#[derive(Debug, Serialize)]
pub struct ImageStatusDto {
    pub id: String,
    pub name: String,
    pub status: ImageStatus,
    pub category: Option<AnalysisKind>,
    pub details: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScanStatusDto {
    pub images: Vec<ImageStatusDto>,
    pub messages: Vec<String>,
    pub lock: GateState,
    pub pending: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// 上传截图（multipart: `session_id` + 一个或多个 `file`）
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponseDto>>, ApiError> {
    let mut session_id: Option<String> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "session_id" => {
                session_id = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read session_id: {}", e))
                })?);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec();
                files.push(ImageUpload {
                    file_name,
                    mime_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let session_id =
        session_id.ok_or_else(|| ApiError::BadRequest("Missing session_id".to_string()))?;
    if files.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".to_string()));
    }

    let result = state
        .upload_images_handler
        .handle(UploadImagesCommand { session_id, files })
        .await?;

    Ok(Json(ApiResponse::success(UploadResponseDto {
        image_ids: result.accepted,
        rejected: result.rejected,
    })))
}

/// 识别所有就绪截图
pub async fn process_images(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<ProcessResponseDto>>, ApiError> {
    let result = state
        .process_images_handler
        .handle(ProcessImagesCommand {
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(ProcessResponseDto {
        submitted: result.submitted,
        succeeded: result.succeeded,
        failed: result.failed,
    })))
}

/// 删除单张截图
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteImageRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_image_handler
        .handle(DeleteImageCommand {
            session_id: req.session_id,
            image_id: req.image_id,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 清空截图
pub async fn clear_images(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<ClearResponseDto>>, ApiError> {
    let result = state
        .clear_images_handler
        .handle(ClearImagesCommand {
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(ClearResponseDto {
        removed: result.removed,
    })))
}

/// 清空提示消息
pub async fn clear_messages(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .clear_messages_handler
        .handle(ClearMessagesCommand {
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 获取截图处理状态
pub async fn scan_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<ScanStatusDto>>, ApiError> {
    let result = state
        .get_scan_status_handler
        .handle(GetScanStatus {
            session_id: req.session_id,
        })
        .await?;

    let images = result
        .images
        .into_iter()
        .map(|image| ImageStatusDto {
            id: image.id,
            name: image.file_name,
            status: image.status,
            category: image.category,
            details: image.details,
            error: image.error,
        })
        .collect();

    Ok(Json(ApiResponse::success(ScanStatusDto {
        images,
        messages: result.messages,
        lock: result.lock,
        pending: result.pending,
    })))
}
