//! Recognition Engine Port - 截图识别服务抽象
//!
//! 定义识别调用的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// 识别调用错误（仅在客户端内部流转）
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Request timeout")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Service error: {0}")]
    Service(String),
}

impl RecognitionError {
    /// 面向用户的提示
    pub fn user_message(&self) -> String {
        match self {
            RecognitionError::Timeout => "Request timed out".to_string(),
            RecognitionError::RateLimited { .. } => "Rate limit exceeded".to_string(),
            RecognitionError::Service(message) => message.clone(),
            _ => "Recognition request failed".to_string(),
        }
    }
}

/// 已编码的截图
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub image_id: String,
    /// `data:<mime>;base64,...`
    pub data_uri: String,
}

/// 识别服务返回
///
/// 成功时为原始 `analysis` 载荷，交给分类器处理；失败时为面向用户的错误信息。
#[derive(Debug, Clone)]
pub struct RecognitionReply {
    pub image_id: String,
    pub outcome: Result<Value, String>,
}

impl RecognitionReply {
    pub fn success(image_id: impl Into<String>, analysis: Value) -> Self {
        Self {
            image_id: image_id.into(),
            outcome: Ok(analysis),
        }
    }

    pub fn failure(image_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            outcome: Err(message.into()),
        }
    }
}

/// Recognition Engine Port
///
/// 外部识别服务的抽象接口。`submit` 不向外抛错，所有失败都转成失败的回复，
/// 方便批量并发调用后统一处理。
#[async_trait]
pub trait RecognitionEnginePort: Send + Sync {
    /// 提交一张截图
    async fn submit(&self, image: &EncodedImage) -> RecognitionReply;

    /// 检查识别服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(RecognitionError::Timeout.user_message(), "Request timed out");
        assert_eq!(
            RecognitionError::RateLimited { attempts: 3 }.user_message(),
            "Rate limit exceeded"
        );
        assert_eq!(
            RecognitionError::Status(500).user_message(),
            "Recognition request failed"
        );
        assert_eq!(
            RecognitionError::Network("refused".to_string()).user_message(),
            "Recognition request failed"
        );
    }
}
