//! Ingestion Context - ImageTask

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::recognition::AnalysisKind;

/// 截图生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Uploading,
    Ready,
    Processing,
    Queued,
    Complete,
    Error,
}

/// 单张上传截图
///
/// 只属于所在会话的流水线，不在会话之间共享。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageTask {
    id: String,
    file_name: String,
    mime_type: String,
    size: usize,
    status: ImageStatus,
    /// 编码后的 data URI，编码完成前为空
    #[serde(skip)]
    data_uri: Option<String>,
    category: Option<AnalysisKind>,
    details: Option<String>,
    error: Option<String>,
    created_at: DateTime<Utc>,
}

impl ImageTask {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, size: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size,
            status: ImageStatus::Uploading,
            data_uri: None,
            category: None,
            details: None,
            error: None,
            created_at: Utc::now(),
        }
    }

    pub fn mark_ready(&mut self, data_uri: String) {
        self.data_uri = Some(data_uri);
        self.status = ImageStatus::Ready;
        self.error = None;
    }

    pub fn mark_processing(&mut self) {
        self.status = ImageStatus::Processing;
    }

    pub fn mark_queued(&mut self, category: AnalysisKind) {
        self.status = ImageStatus::Queued;
        self.category = Some(category);
    }

    pub fn mark_complete(&mut self, category: AnalysisKind, details: String) {
        self.status = ImageStatus::Complete;
        self.category = Some(category);
        self.details = Some(details);
        self.error = None;
    }

    pub fn mark_error(&mut self, error: impl Into<String>) {
        self.status = ImageStatus::Error;
        self.error = Some(error.into());
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn data_uri(&self) -> Option<&str> {
        self.data_uri.as_deref()
    }

    pub fn category(&self) -> Option<AnalysisKind> {
        self.category
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut task = ImageTask::new("forte.png", "image/png", 1024);
        assert_eq!(task.status(), ImageStatus::Uploading);

        task.mark_ready("data:image/png;base64,AAAA".to_string());
        assert_eq!(task.status(), ImageStatus::Ready);
        assert!(task.data_uri().is_some());

        task.mark_processing();
        task.mark_complete(AnalysisKind::Forte, "Forte Tree".to_string());
        assert_eq!(task.status(), ImageStatus::Complete);
        assert_eq!(task.details(), Some("Forte Tree"));
    }

    #[test]
    fn test_error_keeps_message() {
        let mut task = ImageTask::new("a.png", "image/png", 10);
        task.mark_error("Rate limit exceeded");
        assert_eq!(task.status(), ImageStatus::Error);
        assert_eq!(task.error(), Some("Rate limit exceeded"));
    }
}
