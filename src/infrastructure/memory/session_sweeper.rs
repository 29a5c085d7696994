//! Session Sweeper - 定期关闭闲置会话

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::SessionManagerPort;

#[derive(Debug, Clone)]
pub struct SessionSweeperConfig {
    /// 闲置超过该时长的会话会被关闭
    pub expire_secs: u64,
    /// 扫描间隔
    pub interval: Duration,
}

impl Default for SessionSweeperConfig {
    fn default() -> Self {
        Self {
            expire_secs: 86400,
            interval: Duration::from_secs(3600),
        }
    }
}

/// 关闭所有过期会话，返回关闭数量
pub fn sweep_expired(sessions: &dyn SessionManagerPort, expire_secs: u64) -> usize {
    let expired = sessions.get_expired_sessions(expire_secs);
    let mut closed = 0;
    for id in expired {
        match sessions.close(&id) {
            Ok(()) => closed += 1,
            Err(e) => tracing::debug!(session_id = %id, error = %e, "Session already gone"),
        }
    }
    if closed > 0 {
        tracing::info!(closed = closed, "Expired sessions closed");
    }
    closed
}

/// 启动后台扫描任务，`cancel` 触发后退出
pub fn spawn_session_sweeper(
    sessions: Arc<dyn SessionManagerPort>,
    config: SessionSweeperConfig,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.interval);
        // 第一次 tick 立即返回
        interval.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Session sweeper stopped");
                    break;
                }
                _ = interval.tick() => {
                    sweep_expired(sessions.as_ref(), config.expire_secs);
                }
            }
        }
    })
}
