//! WuwaBuilds - 鸣潮配装服务
//!
//! - Domain: build/, catalog, recognition/, ingestion/, stats/
//! - Application: commands, queries, ports, ingestion
//! - Infrastructure: http, memory, catalog, adapters

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wuwabuilds::application::{ImageValidator, RecognitionEnginePort};
use wuwabuilds::config::{load_config, print_config, AppConfig};
use wuwabuilds::infrastructure::http::{AppState, HttpServer, ServerConfig as HttpServerConfig};
use wuwabuilds::infrastructure::{
    spawn_session_sweeper, HttpRecognitionClient, HttpRecognitionClientConfig,
    InMemorySessionManager, JsonCatalog, SessionSweeperConfig,
};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},wuwabuilds={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    tracing::info!("WuwaBuilds - 鸣潮配装服务");
    print_config(&config);

    // 静态目录数据，缺失即无法启动
    let catalog = JsonCatalog::load(&config.catalog.data_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load catalog from {}: {}",
            config.catalog.data_dir.display(),
            e
        )
    })?;
    let catalog = Arc::new(catalog);

    let recognition = &config.recognition;
    let client_config = HttpRecognitionClientConfig::new(&recognition.url)
        .with_timeout(Duration::from_secs(recognition.timeout_secs))
        .with_max_attempts(recognition.max_attempts)
        .with_default_retry_after(Duration::from_secs(recognition.default_retry_after_secs));
    let recognition_client = Arc::new(HttpRecognitionClient::new(client_config)?);

    // 识别服务冷启动较慢，提前唤醒；失败不影响启动
    if recognition.warm_up {
        let client = recognition_client.clone();
        tokio::spawn(async move {
            if client.health_check().await {
                tracing::info!("Recognition service is up");
            } else {
                tracing::warn!("Recognition service did not answer warm-up ping");
            }
        });
    }

    let session_manager = Arc::new(InMemorySessionManager::new());

    let sweeper_cancel = CancellationToken::new();
    let sweeper = spawn_session_sweeper(
        session_manager.clone(),
        SessionSweeperConfig {
            expire_secs: config.session.expire_secs,
            interval: Duration::from_secs(config.session.sweep_interval_secs),
        },
        sweeper_cancel.clone(),
    );

    let state = AppState::new(
        session_manager,
        catalog,
        recognition_client.clone(),
        ImageValidator::new(config.ingestion.limits()),
    );

    let server_config = HttpServerConfig::new(&config.server.host, config.server.port)
        .with_ingestion(&config.ingestion);
    let server = HttpServer::new(server_config, state);

    let shutdown_client = recognition_client.clone();
    let shutdown_sweeper = sweeper_cancel.clone();
    server
        .run_with_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
            shutdown_client.shutdown();
            shutdown_sweeper.cancel();
        })
        .await?;

    sweeper_cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Session sweeper task ended abnormally");
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}
