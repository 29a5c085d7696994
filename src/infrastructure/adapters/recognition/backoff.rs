//! 限流退避等待
//!
//! 等待通过 trait 注入，测试中记录请求的延迟而不真正等待。

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Backoff: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// 真实等待
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioBackoff;

#[async_trait]
impl Backoff for TokioBackoff {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
