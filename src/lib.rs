//! WuwaBuilds - 鸣潮配装截图识别与属性计算
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Recognition Context: 识别结果的分类
//! - Build Context: 配装聚合（角色、武器、技能、声骸）
//! - Ingestion Context: 截图任务与选择锁
//! - Stats: 属性汇总引擎
//!
//! 应用层 (application/):
//! - Ports: 端口定义（RecognitionEngine, Catalog, SessionManager）
//! - Ingestion: 校验、编码、识别结果落地
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: SessionManager 内存实现与过期清理
//! - Catalog: JSON 数据目录
//! - Adapters: 识别服务客户端

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
