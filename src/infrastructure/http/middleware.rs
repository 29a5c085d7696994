//! HTTP Middleware
//!
//! 传输层错误日志（非 200 状态码）

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// 记录 4xx / 5xx 响应
///
/// 业务错误统一以 200 + errno 返回，在 `ApiError::into_response` 中记录；
/// 这里只会看到 axum 自身的拒绝（JSON 解析失败、请求体超限、路由不存在等）。
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    }

    response
}
