// ==========================================
// 门店自提预订系统 - 进程配置
// ==========================================
// 职责: 从环境变量解析服务配置
// 约束: 不含业务配置（门店/时段参数存储在数据库）
// ==========================================

use std::path::PathBuf;

/// 默认监听地址
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8600";

/// 进程配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite 数据库文件路径
    pub db_path: String,

    /// HTTP 监听地址
    pub bind_addr: String,
}

impl AppConfig {
    /// 从环境变量读取配置
    ///
    /// # 环境变量
    /// - CLICK_COLLECT_DB: 数据库文件路径（默认: 数据目录下 click_collect.db）
    /// - CLICK_COLLECT_BIND: 监听地址（默认: 127.0.0.1:8600）
    pub fn from_env() -> Self {
        let db_path = std::env::var("CLICK_COLLECT_DB").unwrap_or_else(|_| default_db_path());
        let bind_addr =
            std::env::var("CLICK_COLLECT_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self { db_path, bind_addr }
    }
}

/// 默认数据库路径（用户数据目录下，目录不存在时回退当前目录）
pub fn default_db_path() -> String {
    let dir = dirs::data_dir()
        .map(|d| d.join("click-collect"))
        .unwrap_or_else(|| PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!("无法创建数据目录 {:?}（将使用当前目录）: {}", dir, e);
        return "click_collect.db".to_string();
    }

    dir.join("click_collect.db").to_string_lossy().to_string()
}
