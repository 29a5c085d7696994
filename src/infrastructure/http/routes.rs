//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                  GET   健康检查
//! - /api/session/create        POST  创建配装会话
//! - /api/session/close         POST  关闭会话
//! - /api/scan/upload           POST  上传截图（multipart）
//! - /api/scan/process          POST  识别就绪截图
//! - /api/scan/delete           POST  删除截图
//! - /api/scan/clear            POST  清空截图
//! - /api/scan/clear_messages   POST  清空提示
//! - /api/scan/status           POST  截图处理状态
//! - /api/build/get             POST  配装与派生属性
//! - /api/build/character       POST  选择 / 取消选择角色
//! - /api/build/level           POST  角色等级
//! - /api/build/sequence        POST  共鸣链节点
//! - /api/build/element         POST  漂泊者属性切换
//! - /api/build/weapon          POST  选择武器
//! - /api/build/weapon_config   POST  武器等级与精炼
//! - /api/build/forte           POST  整体设置共鸣回路
//! - /api/build/forte_node      POST  切换回路节点
//! - /api/build/forte_level     POST  技能等级
//! - /api/build/forte_max       POST  "全满" 三态循环
//! - /api/build/echo            POST  编辑声骸栏位

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/session", session_routes())
        .nest("/scan", scan_routes())
        .nest("/build", build_routes())
}

/// Session 路由
fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_session))
        .route("/close", post(handlers::close_session))
}

/// Scan 路由
fn scan_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload_images))
        .route("/process", post(handlers::process_images))
        .route("/delete", post(handlers::delete_image))
        .route("/clear", post(handlers::clear_images))
        .route("/clear_messages", post(handlers::clear_messages))
        .route("/status", post(handlers::scan_status))
}

/// Build 路由
fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_build))
        .route("/character", post(handlers::select_character))
        .route("/level", post(handlers::set_level))
        .route("/sequence", post(handlers::set_sequence))
        .route("/element", post(handlers::toggle_element))
        .route("/weapon", post(handlers::select_weapon))
        .route("/weapon_config", post(handlers::set_weapon_config))
        .route("/forte", post(handlers::set_forte))
        .route("/forte_node", post(handlers::toggle_forte_node))
        .route("/forte_level", post(handlers::set_forte_level))
        .route("/forte_max", post(handlers::cycle_forte_max))
        .route("/echo", post(handlers::set_echo_panel))
}
