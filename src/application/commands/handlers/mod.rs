//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod build_command_handlers;
mod scan_command_handlers;
mod session_command_handlers;

pub use build_command_handlers::*;
pub use scan_command_handlers::*;
pub use session_command_handlers::*;
