//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::ingestion::IngestionLimits;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 识别服务配置
    #[serde(default)]
    pub recognition: RecognitionConfig,

    /// 截图上传限制
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// 数据目录
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// 会话配置
    #[serde(default)]
    pub session: SessionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 识别服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionConfig {
    /// 识别服务基础 URL
    #[serde(default = "default_recognition_url")]
    pub url: String,

    /// 单次请求超时（秒）
    #[serde(default = "default_recognition_timeout")]
    pub timeout_secs: u64,

    /// 429 时的最大尝试次数（含首次）
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// 缺少 Retry-After 时的等待秒数
    #[serde(default = "default_retry_after")]
    pub default_retry_after_secs: u64,

    /// 启动时预热识别服务
    #[serde(default = "default_warm_up")]
    pub warm_up: bool,
}

fn default_recognition_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_recognition_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_after() -> u64 {
    5
}

fn default_warm_up() -> bool {
    true
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            url: default_recognition_url(),
            timeout_secs: default_recognition_timeout(),
            max_attempts: default_max_attempts(),
            default_retry_after_secs: default_retry_after(),
            warm_up: default_warm_up(),
        }
    }
}

/// 截图上传限制
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    /// 会话内最多截图数
    #[serde(default = "default_max_images")]
    pub max_images: usize,

    /// 单张大小上限（字节），默认 40MB
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,

    /// 允许的 MIME 类型
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

fn default_max_images() -> usize {
    10
}

fn default_max_file_size() -> usize {
    40 * 1024 * 1024
}

fn default_allowed_types() -> Vec<String> {
    vec!["image/jpeg".to_string(), "image/png".to_string()]
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_images: default_max_images(),
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
        }
    }
}

impl IngestionConfig {
    pub fn limits(&self) -> IngestionLimits {
        IngestionLimits {
            max_images: self.max_images,
            max_file_size: self.max_file_size,
            allowed_types: self.allowed_types.clone(),
        }
    }
}

/// 数据目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// 角色、武器、声骸与数值表所在目录
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("Data")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// 会话配置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// 闲置过期时间（秒）
    #[serde(default = "default_session_expire")]
    pub expire_secs: u64,

    /// 过期扫描间隔（秒）
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_session_expire() -> u64 {
    86400 // 24 小时
}

fn default_sweep_interval() -> u64 {
    3600 // 1 小时
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expire_secs: default_session_expire(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5060);
        assert_eq!(config.recognition.url, "http://localhost:5000");
        assert_eq!(config.recognition.max_attempts, 3);
        assert_eq!(config.catalog.data_dir, PathBuf::from("Data"));
        assert_eq!(config.session.expire_secs, 86400);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5060");
    }

    #[test]
    fn test_ingestion_limits() {
        let limits = IngestionConfig::default().limits();
        assert_eq!(limits.max_images, 10);
        assert_eq!(limits.max_file_size, 40 * 1024 * 1024);
        assert_eq!(limits.allowed_types, vec!["image/jpeg", "image/png"]);
    }
}
