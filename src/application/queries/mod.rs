//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod build_queries;
mod scan_queries;

pub mod handlers;

pub use build_queries::*;
pub use scan_queries::*;
