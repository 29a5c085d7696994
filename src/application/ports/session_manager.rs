//! Session Manager Port - 会话生命周期管理
//!
//! 定义会话管理的抽象接口，具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::build::BuildState;
use crate::domain::ingestion::{ImageTask, SelectionGate};

/// Session Manager 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),
}

/// 配装会话（in-memory）
///
/// 选择锁与待处理队列是会话的字段，不是全局状态。
#[derive(Debug, Clone)]
pub struct BuildSession {
    pub id: String,
    pub build: BuildState,
    pub gate: SelectionGate,
    pub images: Vec<ImageTask>,
    /// 面向用户的提示，批次内只追加
    pub messages: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Default for BuildSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            build: BuildState::new(),
            gate: SelectionGate::new(),
            images: Vec::new(),
            messages: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn image_mut(&mut self, image_id: &str) -> Option<&mut ImageTask> {
        self.images.iter_mut().find(|task| task.id() == image_id)
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// 同一提示只保留一条
    pub fn push_message_once(&mut self, message: &str) {
        if !self.messages.iter().any(|m| m == message) {
            self.messages.push(message.to_string());
        }
    }

    pub fn remove_message(&mut self, message: &str) {
        self.messages.retain(|m| m != message);
    }
}

/// Session Manager Port
///
/// 管理配装会话的生命周期，所有状态存储在内存中
pub trait SessionManagerPort: Send + Sync {
    /// 创建新会话
    fn create(&self, session: BuildSession) -> Result<String, SessionError>;

    /// 获取会话快照
    fn get(&self, id: &str) -> Result<BuildSession, SessionError>;

    /// 在条目锁内修改会话，闭包内不得挂起
    fn modify(
        &self,
        id: &str,
        f: Box<dyn FnOnce(&mut BuildSession) + '_>,
    ) -> Result<(), SessionError>;

    /// 检查会话是否有效
    fn is_valid(&self, id: &str) -> bool;

    /// 关闭会话
    fn close(&self, id: &str) -> Result<(), SessionError>;

    /// 获取所有过期会话的 ID
    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String>;

    /// 获取所有会话 ID
    fn list_all(&self) -> Vec<String>;
}

/// 修改会话并取回闭包的返回值
pub fn modify_session<T>(
    sessions: &dyn SessionManagerPort,
    id: &str,
    f: impl FnOnce(&mut BuildSession) -> T,
) -> Result<T, SessionError> {
    let mut output = None;
    sessions.modify(id, Box::new(|session| output = Some(f(session))))?;
    output.ok_or_else(|| SessionError::NotFound(id.to_string()))
}
