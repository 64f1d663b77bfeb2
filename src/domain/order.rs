// ==========================================
// 门店自提预订系统 - 订单领域模型
// ==========================================
// 订单独占其明细（同事务创建，级联删除，不可转移）
// 订单持有时段的非拥有引用（仅用于展示，创建后不再回写时段）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::OrderStatus;

// ==========================================
// Order - 订单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,                 // 订单ID
    pub order_number: String,             // 订单号（人类可读，全局唯一）
    pub store_id: String,                 // 所属门店
    pub slot_id: String,                  // 预订时段（非拥有引用）
    pub customer_name: String,            // 顾客姓名
    pub customer_phone: String,           // 顾客电话
    pub customer_email: Option<String>,   // 顾客邮箱（可选）
    pub status: OrderStatus,              // 订单状态
    pub estimated_total: f64,             // 预估金额（提交时计算）
    pub final_total: Option<f64>,         // 最终金额（店员称重后设置）
    pub pickup_time: NaiveDateTime,       // 自提时间（创建时从时段复制）
    pub request_details: Option<String>,  // 需求描述（自由文本）
    pub special_notes: Option<String>,    // 特殊备注（自由文本）
    pub privacy_accepted: bool,           // 隐私条款确认
    pub created_at: NaiveDateTime,        // 创建时间
    pub updated_at: NaiveDateTime,        // 更新时间
    pub items: Vec<OrderItem>,            // 订单明细
}

// ==========================================
// OrderItem - 订单明细
// ==========================================
// price 为下单时刻的单价快照；终态前店员可修正 price/quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: String,    // 明细ID
    pub order_id: String,   // 所属订单
    pub product_id: String, // 引用商品（外部目录）
    pub quantity: f64,      // 数量
    pub unit: String,       // 单位
    pub price: f64,         // 单价（下单时快照，可被店员修正）
}

impl OrderItem {
    /// 明细行金额
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity
    }
}

// ==========================================
// 下单输入
// ==========================================
// 来自客户端本地购物车的不可信输入，提交时在事务内整体校验

/// 下单请求（引擎层输入）
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub store_id: Option<String>,        // 门店ID（缺省/auto 时自动选择）
    pub slot_id: String,                 // 期望时段（可能已过期，由回退解析器兜底）
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub request_details: Option<String>,
    pub special_notes: Option<String>,
    pub privacy_accepted: bool,
    pub items: Vec<NewOrderItem>,
}

/// 下单明细输入
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64, // 客户端快照单价（仅用于预估，最终价以称重为准）
}

/// 店员明细修正（随状态转换同事务生效）
#[derive(Debug, Clone)]
pub struct ItemCorrection {
    pub item_id: String,
    pub price: f64,
    pub quantity: f64,
}

/// 生成人类可读订单号
///
/// 形如 `MILANO-CENTRO-00042`：门店 slug（大写）+ 门店内单调序号。
/// slug 全局唯一、序号在订单创建事务内分配，因此订单号全局唯一，
/// 且不受同一毫秒并发创建影响。
pub fn make_order_number(store_slug: &str, seq: i64) -> String {
    format!("{}-{:05}", store_slug.to_uppercase(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_order_number() {
        assert_eq!(make_order_number("milano-centro", 1), "MILANO-CENTRO-00001");
        assert_eq!(make_order_number("milano-centro", 42), "MILANO-CENTRO-00042");
        // 序号超出补零宽度时不截断
        assert_eq!(make_order_number("x", 123456), "X-123456");
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            item_id: "I1".to_string(),
            order_id: "O1".to_string(),
            product_id: "P1".to_string(),
            quantity: 2.0,
            unit: "kg".to_string(),
            price: 18.5,
        };
        assert!((item.line_total() - 37.0).abs() < 1e-9);
    }
}
