//! HTTP Server
//!
//! Axum 服务器: 路由 + CORS + 请求追踪 + 上传大小限制

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::CONTENT_TYPE;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::IngestionConfig;

/// multipart 分隔符与文本字段的余量
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// 单个请求体的硬上限，超出时前端分批上传
const MAX_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 单个请求体上限（字节）
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5060,
            body_limit: MAX_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// 按截图数量与单张大小推算请求体上限，不超过 `MAX_BODY_LIMIT`
    pub fn with_ingestion(mut self, ingestion: &IngestionConfig) -> Self {
        self.body_limit = ingestion
            .max_file_size
            .saturating_mul(ingestion.max_images)
            .saturating_add(MULTIPART_OVERHEAD)
            .min(MAX_BODY_LIMIT);
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 组装完整的 Router（路由 + 中间件 + 状态）
pub fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    // 前端与服务分开部署
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    create_routes()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 启动服务器，`shutdown_signal` 完成后停止接收新连接
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.state.clone(), self.config.body_limit);
        let addr = self.config.addr();

        let listener = TcpListener::bind(&addr).await?;
        info!(
            addr = %addr,
            body_limit = self.config.body_limit,
            "HTTP server listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}
