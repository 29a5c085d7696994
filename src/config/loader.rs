//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `WUWABUILDS_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `WUWABUILDS_SERVER__PORT=8080`
/// - `WUWABUILDS_RECOGNITION__URL=http://ocr:5000`
/// - `WUWABUILDS_CATALOG__DATA_DIR=/srv/wuwa/Data`
/// - `WUWABUILDS_INGESTION__ALLOWED_TYPES=image/png,image/webp`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("recognition.url", "http://localhost:5000")?
        .set_default("recognition.timeout_secs", 30)?
        .set_default("recognition.max_attempts", 3)?
        .set_default("recognition.default_retry_after_secs", 5)?
        .set_default("recognition.warm_up", true)?
        .set_default("ingestion.max_images", 10)?
        .set_default("ingestion.max_file_size", 40 * 1024 * 1024)?
        .set_default("ingestion.allowed_types", vec!["image/jpeg", "image/png"])?
        .set_default("catalog.data_dir", "Data")?
        .set_default("session.expire_secs", 86400)?
        .set_default("session.sweep_interval_secs", 3600)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("WUWABUILDS")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("ingestion.allowed_types")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.recognition.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Recognition URL cannot be empty".to_string(),
        ));
    }

    if config.recognition.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Recognition timeout cannot be 0".to_string(),
        ));
    }

    if config.recognition.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Recognition max_attempts cannot be 0".to_string(),
        ));
    }

    if config.ingestion.max_images == 0 {
        return Err(ConfigError::ValidationError(
            "Ingestion max_images cannot be 0".to_string(),
        ));
    }

    if config.catalog.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Catalog data_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Recognition URL: {}", config.recognition.url);
    tracing::info!("Recognition Timeout: {}s", config.recognition.timeout_secs);
    tracing::info!(
        "Recognition Attempts: {} (default Retry-After {}s)",
        config.recognition.max_attempts,
        config.recognition.default_retry_after_secs
    );
    tracing::info!("Recognition Warm-up: {}", config.recognition.warm_up);
    tracing::info!("Max Images: {}", config.ingestion.max_images);
    tracing::info!("Max File Size: {} bytes", config.ingestion.max_file_size);
    tracing::info!("Allowed Types: {}", config.ingestion.allowed_types.join(", "));
    tracing::info!("Catalog Directory: {:?}", config.catalog.data_dir);
    tracing::info!("Session Expire: {}s", config.session.expire_secs);
    tracing::info!("Session Sweep Interval: {}s", config.session.sweep_interval_secs);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
