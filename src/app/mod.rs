// ==========================================
// 门店自提预订系统 - 应用层
// ==========================================
// 职责: HTTP 边界集成,连接外部协作方与业务核心
// ==========================================

pub mod http;
pub mod state;

// 重导出
pub use http::app_router;
pub use state::AppState;
