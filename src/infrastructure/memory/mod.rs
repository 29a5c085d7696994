//! Memory Layer - In-Memory State Management
//!
//! 实现 SessionManager 与闲置会话清理，管理配装会话的内存状态

mod session_manager;
mod session_sweeper;

pub use session_manager::InMemorySessionManager;
pub use session_sweeper::{spawn_session_sweeper, sweep_expired, SessionSweeperConfig};
