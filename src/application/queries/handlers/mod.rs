//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod build_handlers;
mod scan_handlers;

pub use build_handlers::*;
pub use scan_handlers::*;
