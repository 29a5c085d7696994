//! Scan Commands - 截图上传与识别

/// 单个上传文件
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// 上传截图命令
#[derive(Debug, Clone)]
pub struct UploadImagesCommand {
    pub session_id: String,
    pub files: Vec<ImageUpload>,
}

/// 上传截图响应
#[derive(Debug, Clone)]
pub struct UploadImagesResponse {
    /// 新建任务的 id，按上传顺序
    pub accepted: Vec<String>,
    /// "<file>: <reason>"
    pub rejected: Vec<String>,
}

/// 识别所有就绪截图
#[derive(Debug, Clone)]
pub struct ProcessImagesCommand {
    pub session_id: String,
}

/// 识别批次响应
#[derive(Debug, Clone)]
pub struct ProcessImagesResponse {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// 删除单张截图
#[derive(Debug, Clone)]
pub struct DeleteImageCommand {
    pub session_id: String,
    pub image_id: String,
}

/// 清空截图
#[derive(Debug, Clone)]
pub struct ClearImagesCommand {
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub struct ClearImagesResponse {
    pub removed: usize,
}

/// 清空提示消息
#[derive(Debug, Clone)]
pub struct ClearMessagesCommand {
    pub session_id: String,
}
