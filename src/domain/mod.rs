//! Domain Layer - 领域层
//!
//! 包含以下限界上下文:
//! - Build Context: 配装编辑状态
//! - Recognition Context: 识别结果与分类
//! - Ingestion Context: 截图任务与角色选择锁
//! - Stats: 属性汇总引擎
//!
//! 以及只读目录数据的记录类型。

pub mod build;
pub mod catalog;
pub mod ingestion;
pub mod recognition;
pub mod stats;
