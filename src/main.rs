// ==========================================
// 库存生产系统 - HTTP 服务主入口
// ==========================================
// 技术栈: axum + Rust + SQLite
// 配置: 环境变量（见 config::config_keys）
// ==========================================

use anyhow::Context;

use inventory_production::{build_router, logging, perf, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 先加载配置，日志格式由配置决定
    let config = AppConfig::from_env();

    // 初始化日志系统
    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("库存生产系统 - 原材料库存与生产管理");
    tracing::info!("系统版本: {}", inventory_production::VERSION);
    tracing::info!("==================================================");

    perf::configure(config.perf_sql, config.slow_sql_ms);
    tracing::info!(
        db_path = %config.db_path,
        bind_addr = %config.bind_addr,
        cors_origin_prefixes = ?config.cors_origin_prefixes,
        perf_sql = config.perf_sql,
        log_format = ?config.log_format,
        "配置加载完成"
    );

    // 创建AppState
    let state = AppState::new(&config).map_err(anyhow::Error::msg)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("无法监听地址: {}", config.bind_addr))?;
    tracing::info!("HTTP 服务已启动: http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("HTTP 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "无法监听退出信号");
    }
}
