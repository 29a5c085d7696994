//! HTTP Recognition Client - 调用外部截图识别服务
//!
//! 实现 RecognitionEnginePort trait
//!
//! 外部识别 API:
//! POST {base}/api/ocr
//! Request: {"image": "data:image/png;base64,..."}  (JSON)
//! Response: {"success": bool, "analysis"?: {...}, "error"?: "..."}
//! 429 响应携带 `Retry-After: <seconds>`
//!
//! GET {base}/health 仅用于预热

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::backoff::{Backoff, TokioBackoff};
use crate::application::ports::{
    EncodedImage, RecognitionEnginePort, RecognitionError, RecognitionReply,
};

/// 识别请求体 (JSON)
#[derive(Debug, Serialize)]
struct OcrRequest<'a> {
    image: &'a str,
}

/// 识别响应体
#[derive(Debug, Deserialize)]
struct OcrResponse {
    success: bool,
    #[serde(default)]
    analysis: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// 超时与重试策略
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 总尝试次数（含首次）
    pub max_attempts: u32,
    /// 单次请求超时，超时不重试
    pub timeout: Duration,
    /// 429 未携带 Retry-After 时的等待时间
    pub default_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(30),
            default_retry_after: Duration::from_secs(5),
        }
    }
}

/// HTTP 识别客户端配置
#[derive(Debug, Clone)]
pub struct HttpRecognitionClientConfig {
    /// 识别服务基础 URL
    pub base_url: String,
    pub policy: RetryPolicy,
}

impl Default for HttpRecognitionClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            policy: RetryPolicy::default(),
        }
    }
}

impl HttpRecognitionClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.policy.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.policy.max_attempts = attempts;
        self
    }

    pub fn with_default_retry_after(mut self, delay: Duration) -> Self {
        self.policy.default_retry_after = delay;
        self
    }
}

/// 单次请求的结果
enum Attempt {
    Done(Value),
    RateLimited(Duration),
}

/// HTTP 识别客户端
///
/// 每次调用持有根令牌的子令牌，超时只取消自己；`shutdown` 取消根令牌，
/// 所有进行中的调用随之结束。
pub struct HttpRecognitionClient {
    client: Client,
    config: HttpRecognitionClientConfig,
    backoff: Arc<dyn Backoff>,
    shutdown: CancellationToken,
}

impl HttpRecognitionClient {
    /// 创建新的 HTTP 识别客户端
    pub fn new(config: HttpRecognitionClientConfig) -> Result<Self, RecognitionError> {
        let client = Client::builder()
            .build()
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            backoff: Arc::new(TokioBackoff),
            shutdown: CancellationToken::new(),
        })
    }

    /// 替换退避等待实现
    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    /// 取消所有进行中的识别调用
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// 获取识别 URL
    fn ocr_url(&self) -> String {
        format!("{}/api/ocr", self.config.base_url.trim_end_matches('/'))
    }

    /// 获取健康检查 URL
    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }

    async fn request(&self, image: &EncodedImage) -> Result<Value, RecognitionError> {
        let policy = &self.config.policy;
        let max_attempts = policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let token = self.shutdown.child_token();
            let outcome = tokio::select! {
                _ = token.cancelled() => return Err(RecognitionError::Cancelled),
                _ = tokio::time::sleep(policy.timeout) => {
                    token.cancel();
                    return Err(RecognitionError::Timeout);
                }
                outcome = self.attempt(image) => outcome?,
            };

            match outcome {
                Attempt::Done(analysis) => return Ok(analysis),
                Attempt::RateLimited(delay) if attempt < max_attempts => {
                    tracing::warn!(
                        image_id = %image.image_id,
                        attempt = attempt,
                        delay_secs = delay.as_secs(),
                        "Recognition rate limited, retrying"
                    );
                    tokio::select! {
                        _ = self.shutdown.cancelled() => return Err(RecognitionError::Cancelled),
                        _ = self.backoff.sleep(delay) => {}
                    }
                }
                Attempt::RateLimited(_) => {
                    return Err(RecognitionError::RateLimited {
                        attempts: max_attempts,
                    })
                }
            }
        }

        Err(RecognitionError::RateLimited {
            attempts: max_attempts,
        })
    }

    /// 发送一次请求并读取响应
    async fn attempt(&self, image: &EncodedImage) -> Result<Attempt, RecognitionError> {
        let response = self
            .client
            .post(self.ocr_url())
            .json(&OcrRequest {
                image: &image.data_uri,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RecognitionError::Network(format!("Cannot connect to recognition service: {}", e))
                } else {
                    RecognitionError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let delay = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(self.config.policy.default_retry_after);
            return Ok(Attempt::RateLimited(delay));
        }
        if !status.is_success() {
            return Err(RecognitionError::Status(status.as_u16()));
        }

        let body: OcrResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::InvalidResponse(e.to_string()))?;

        match (body.success, body.analysis) {
            (true, Some(analysis)) => Ok(Attempt::Done(analysis)),
            (true, None) => Err(RecognitionError::InvalidResponse(
                "missing analysis".to_string(),
            )),
            (false, _) => Err(RecognitionError::Service(
                body.error
                    .unwrap_or_else(|| "Recognition request failed".to_string()),
            )),
        }
    }
}

#[async_trait]
impl RecognitionEnginePort for HttpRecognitionClient {
    async fn submit(&self, image: &EncodedImage) -> RecognitionReply {
        tracing::debug!(
            url = %self.ocr_url(),
            image_id = %image.image_id,
            payload_len = image.data_uri.len(),
            "Sending recognition request"
        );

        match self.request(image).await {
            Ok(analysis) => {
                tracing::debug!(image_id = %image.image_id, "Recognition completed");
                RecognitionReply::success(&image.image_id, analysis)
            }
            Err(e) => {
                tracing::warn!(image_id = %image.image_id, error = %e, "Recognition request failed");
                RecognitionReply::failure(&image.image_id, e.user_message())
            }
        }
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackoff {
        delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Backoff for RecordingBackoff {
        async fn sleep(&self, delay: Duration) {
            self.delays.lock().unwrap().push(delay);
        }
    }

    fn analysis() -> Value {
        json!({"type": "Sequences", "sequence": 2})
    }

    fn image() -> EncodedImage {
        EncodedImage {
            image_id: "img-1".to_string(),
            data_uri: "data:image/png;base64,AA==".to_string(),
        }
    }

    /// 启动模拟识别服务，返回基础 URL
    async fn spawn_mock(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// 按调用次序返回脚本化响应
    fn scripted(calls: Arc<AtomicUsize>, script: fn(usize) -> Response) -> Router {
        Router::new().route(
            "/api/ocr",
            post(move || {
                let calls = calls.clone();
                async move { script(calls.fetch_add(1, Ordering::SeqCst)) }
            }),
        )
    }

    fn client(base_url: String, backoff: Arc<RecordingBackoff>) -> HttpRecognitionClient {
        HttpRecognitionClient::new(HttpRecognitionClientConfig::new(base_url))
            .unwrap()
            .with_backoff(backoff)
    }

    #[test]
    fn test_config_default() {
        let config = HttpRecognitionClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.policy.max_attempts, 3);
        assert_eq!(config.policy.timeout, Duration::from_secs(30));
        assert_eq!(config.policy.default_retry_after, Duration::from_secs(5));
    }

    #[test]
    fn test_config_builder() {
        let config = HttpRecognitionClientConfig::new("http://ocr:9000")
            .with_timeout(Duration::from_secs(10))
            .with_max_attempts(5);
        assert_eq!(config.base_url, "http://ocr:9000");
        assert_eq!(config.policy.timeout, Duration::from_secs(10));
        assert_eq!(config.policy.max_attempts, 5);
    }

    #[tokio::test]
    async fn test_retries_rate_limit_then_succeeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = scripted(calls.clone(), |n| match n {
            0 => (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "2")]).into_response(),
            1 => (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "1")]).into_response(),
            _ => Json(json!({"success": true, "analysis": analysis()})).into_response(),
        });
        let backoff = Arc::new(RecordingBackoff::default());
        let client = client(spawn_mock(router).await, backoff.clone());

        let reply = client.submit(&image()).await;

        assert_eq!(reply.outcome, Ok(analysis()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *backoff.delays.lock().unwrap(),
            vec![Duration::from_secs(2), Duration::from_secs(1)]
        );
    }

    #[tokio::test]
    async fn test_rate_limit_exhausted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = scripted(calls.clone(), |_| StatusCode::TOO_MANY_REQUESTS.into_response());
        let backoff = Arc::new(RecordingBackoff::default());
        let client = client(spawn_mock(router).await, backoff.clone());

        let reply = client.submit(&image()).await;

        assert_eq!(reply.outcome, Err("Rate limit exceeded".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 未携带 Retry-After 时使用默认值
        assert_eq!(
            *backoff.delays.lock().unwrap(),
            vec![Duration::from_secs(5), Duration::from_secs(5)]
        );
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = scripted(calls.clone(), |_| {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        });
        let client = client(spawn_mock(router).await, Arc::default());

        let reply = client.submit(&image()).await;

        assert_eq!(reply.outcome, Err("Recognition request failed".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_service_error_message_passes_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = scripted(calls, |_| {
            Json(json!({"success": false, "error": "No text detected"})).into_response()
        });
        let client = client(spawn_mock(router).await, Arc::default());

        let reply = client.submit(&image()).await;
        assert_eq!(reply.outcome, Err("No text detected".to_string()));
    }

    #[tokio::test]
    async fn test_timeout_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/api/ocr",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Json(json!({"success": true, "analysis": analysis()}))
                }
            }),
        );
        let config = HttpRecognitionClientConfig::new(spawn_mock(router).await)
            .with_timeout(Duration::from_millis(100));
        let client = HttpRecognitionClient::new(config).unwrap();

        let reply = client.submit(&image()).await;

        assert_eq!(reply.outcome, Err("Request timed out".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_calls() {
        let router = Router::new().route(
            "/api/ocr",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"success": true, "analysis": analysis()}))
            }),
        );
        let client = Arc::new(HttpRecognitionClient::new(HttpRecognitionClientConfig::new(
            spawn_mock(router).await,
        ))
        .unwrap());

        let in_flight = {
            let client = client.clone();
            tokio::spawn(async move { client.submit(&image()).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.shutdown();

        let reply = in_flight.await.unwrap();
        assert_eq!(reply.outcome, Err("Recognition request failed".to_string()));
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = Router::new().route("/health", get(|| async { StatusCode::OK }));
        let client = client(spawn_mock(router).await, Arc::default());
        assert!(client.health_check().await);

        let unreachable = HttpRecognitionClient::new(HttpRecognitionClientConfig::new(
            "http://127.0.0.1:1",
        ))
        .unwrap();
        assert!(!unreachable.health_check().await);
    }
}
