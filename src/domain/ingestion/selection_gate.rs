//! SelectionLock & PendingQueue
//!
//! 状态机: `Locked`（未选角色）/ `Unlocked`。初始为 `Locked`。
//! 锁定期间非角色结果按到达顺序进入队列，解锁时整体按序取出，只取一次。

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::domain::recognition::{AnalysisKind, RecognitionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    Locked,
    Unlocked,
}

/// 入队被拒绝（角色结果永远不入队）
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterNotQueueable(pub RecognitionResult);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionGate {
    state: GateState,
    pending: VecDeque<RecognitionResult>,
}

impl Default for SelectionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Locked,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == GateState::Locked
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// 锁定期间缓存非角色结果
    pub fn enqueue(&mut self, result: RecognitionResult) -> Result<(), CharacterNotQueueable> {
        if result.kind() == Some(AnalysisKind::Character) {
            return Err(CharacterNotQueueable(result));
        }
        self.pending.push_back(result);
        Ok(())
    }

    /// 选中角色: 解锁并取出全部待处理结果（按到达顺序）
    ///
    /// 已解锁时队列必然为空，返回空列表。
    pub fn unlock(&mut self) -> Vec<RecognitionResult> {
        self.state = GateState::Unlocked;
        self.pending.drain(..).collect()
    }

    /// 取消选择角色: 重新上锁
    pub fn lock(&mut self) {
        self.state = GateState::Locked;
    }

    /// 删除某张截图对应的待处理结果
    pub fn discard(&mut self, image_id: &str) {
        self.pending.retain(|r| r.image_id != image_id);
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }
}
