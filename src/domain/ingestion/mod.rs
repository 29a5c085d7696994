//! Ingestion Context - 截图导入上下文
//!
//! 职责:
//! - ImageTask 生命周期
//! - SelectionLock 与 PendingQueue

mod image_task;
mod selection_gate;

pub use image_task::{ImageStatus, ImageTask};
pub use selection_gate::{CharacterNotQueueable, GateState, SelectionGate};
