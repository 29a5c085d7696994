//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod catalog;
mod recognition_engine;
mod session_manager;

pub use catalog::{CatalogError, CatalogPort};
pub use recognition_engine::{
    EncodedImage, RecognitionEnginePort, RecognitionError, RecognitionReply,
};
pub use session_manager::{modify_session, BuildSession, SessionError, SessionManagerPort};
