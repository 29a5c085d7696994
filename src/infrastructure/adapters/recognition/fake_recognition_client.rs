//! Fake Recognition Client - 用于测试的识别客户端
//!
//! 按调用顺序返回预设的回复，不实际调用识别服务

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::application::ports::{EncodedImage, RecognitionEnginePort, RecognitionReply};

/// Fake Recognition Client
///
/// 预设回复用完后返回 `unknown` 类型的载荷
#[derive(Default)]
pub struct FakeRecognitionClient {
    script: Mutex<VecDeque<Result<Value, String>>>,
    submitted: Mutex<Vec<String>>,
}

impl FakeRecognitionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个成功回复（`analysis` 载荷）
    pub fn with_analysis(self, analysis: Value) -> Self {
        self.push(Ok(analysis));
        self
    }

    /// 追加一个失败回复
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    fn push(&self, reply: Result<Value, String>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    /// 已提交的截图 id（按调用顺序）
    pub fn submitted(&self) -> Vec<String> {
        self.submitted
            .lock()
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecognitionEnginePort for FakeRecognitionClient {
    async fn submit(&self, image: &EncodedImage) -> RecognitionReply {
        tracing::debug!(image_id = %image.image_id, "FakeRecognitionClient: returning scripted reply");

        if let Ok(mut ids) = self.submitted.lock() {
            ids.push(image.image_id.clone());
        }
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Ok(serde_json::json!({"type": "unknown"})));

        RecognitionReply {
            image_id: image.image_id.clone(),
            outcome: next,
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}
