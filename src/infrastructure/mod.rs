//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod catalog;
pub mod http;
pub mod memory;

pub use adapters::{HttpRecognitionClient, HttpRecognitionClientConfig};
pub use catalog::JsonCatalog;
pub use memory::{spawn_session_sweeper, InMemorySessionManager, SessionSweeperConfig};
