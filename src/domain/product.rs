// ==========================================
// 门店自提预订系统 - 商品领域模型
// ==========================================
// 商品目录由外部后台维护，本核心只在下单时校验引用
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,        // 商品ID
    pub name: String,              // 商品名称
    pub unit: String,              // 计价单位（kg/份/…）
    pub price_per_unit: f64,       // 目录单价（下单时快照到明细）
    pub created_at: NaiveDateTime, // 创建时间
}
