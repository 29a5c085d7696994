//! Build Queries

/// 获取配装快照及派生属性
#[derive(Debug, Clone)]
pub struct GetBuild {
    pub session_id: String,
}
