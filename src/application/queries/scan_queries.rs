//! Scan Queries

/// 获取截图处理状态
#[derive(Debug, Clone)]
pub struct GetScanStatus {
    pub session_id: String,
}
