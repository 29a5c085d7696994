//! Scan Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SessionManagerPort;
use crate::application::queries::GetScanStatus;
use crate::domain::ingestion::{GateState, ImageStatus, ImageTask};
use crate::domain::recognition::AnalysisKind;

// ============================================================================
// Response DTOs
// ============================================================================

/// 单张截图状态
#[derive(Debug, Clone)]
pub struct ImageStatusResponse {
    pub id: String,
    pub file_name: String,
    pub status: ImageStatus,
    pub category: Option<AnalysisKind>,
    pub details: Option<String>,
    pub error: Option<String>,
}

impl From<&ImageTask> for ImageStatusResponse {
    fn from(task: &ImageTask) -> Self {
        Self {
            id: task.id().to_string(),
            file_name: task.file_name().to_string(),
            status: task.status(),
            category: task.category(),
            details: task.details().map(str::to_string),
            error: task.error().map(str::to_string),
        }
    }
}

/// 会话内截图处理状态
#[derive(Debug, Clone)]
pub struct ScanStatusResponse {
    pub images: Vec<ImageStatusResponse>,
    pub messages: Vec<String>,
    pub lock: GateState,
    pub pending: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetScanStatus Handler
pub struct GetScanStatusHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl GetScanStatusHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        query: GetScanStatus,
    ) -> Result<ScanStatusResponse, ApplicationError> {
        let session = self.session_manager.get(&query.session_id)?;

        Ok(ScanStatusResponse {
            images: session.images.iter().map(ImageStatusResponse::from).collect(),
            messages: session.messages,
            lock: session.gate.state(),
            pending: session.gate.pending_len(),
        })
    }
}
