// ==========================================
// 门店自提预订系统 - 服务主入口
// ==========================================
// 技术栈: Rust + SQLite + Salvo
// 系统定位: 时段容量预订与订单生命周期账本
// ==========================================

use std::sync::Arc;

use salvo::prelude::*;

use click_collect::app::{app_router, AppState};
use click_collect::config::AppConfig;
use click_collect::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("门店自提预订系统 - 预订与订单核心");
    tracing::info!("系统版本: {}", click_collect::VERSION);
    tracing::info!("==================================================");

    // 读取配置
    let config = AppConfig::from_env();
    tracing::info!("使用数据库: {}", config.db_path);

    // 创建AppState
    tracing::info!("正在初始化AppState...");
    let state = Arc::new(AppState::new(config.db_path.clone())?);
    tracing::info!("AppState初始化成功");

    // 启动 HTTP 服务
    let router = app_router(state);
    tracing::info!("HTTP 服务监听: {}", config.bind_addr);

    let acceptor = TcpListener::new(config.bind_addr.clone()).bind().await;
    Server::new(acceptor).serve(router).await;

    tracing::info!("服务已退出");
    Ok(())
}
