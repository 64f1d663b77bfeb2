// ==========================================
// 门店自提预订系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 多步写入（预订+建单、修正+状态变更）必须在单事务内完成
// ==========================================

pub mod error;
pub mod order_repo;
pub mod product_repo;
pub mod slot_repo;
pub mod store_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use order_repo::OrderRepository;
pub use product_repo::ProductRepository;
pub use slot_repo::TimeSlotRepository;
pub use store_repo::StoreRepository;

use chrono::NaiveDateTime;

/// 数据库时间格式（文本列，字典序即时间序）
pub(crate) const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// 格式化时间为数据库文本
pub(crate) fn format_dt(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

/// 解析数据库文本时间（解析失败回退 epoch，避免单条脏数据拖垮整个查询）
pub(crate) fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| {
        chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    })
}
