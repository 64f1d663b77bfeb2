// ==========================================
// 门店自提预订系统 - 门店领域模型
// ==========================================
// 门店在系统初始化时创建，本核心范围内不可变
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Store - 门店
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub store_id: String,              // 门店ID
    pub name: String,                  // 门店名称
    pub slug: String,                  // URL 标识（全局唯一，订单号前缀来源）
    pub address: Option<String>,       // 地址
    pub phone: Option<String>,         // 电话
    pub email: Option<String>,         // 邮箱
    pub slot_duration_minutes: i32,    // 时段时长（分钟）
    pub max_orders_per_slot: i32,      // 单时段并发订单上限
    pub created_at: NaiveDateTime,     // 创建时间
}
