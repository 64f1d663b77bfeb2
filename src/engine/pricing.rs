// ==========================================
// 门店自提预订系统 - 金额核算引擎
// ==========================================
// 职责: 订单金额的唯一计算口径
// 红线: 预估价与最终价之间不做任何边界校验——
//       称重后的最终价即权威价（按重计价的业务现实）
// ==========================================

use crate::domain::order::{NewOrderItem, OrderItem};

// ==========================================
// PricingReconciler - 金额核算引擎
// ==========================================
pub struct PricingReconciler {
    // 无状态引擎，不需要注入依赖
}

impl PricingReconciler {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算预估金额
    ///
    /// 提交时刻的单价快照 × 数量求和；不回查目录现价。
    pub fn estimate(&self, items: &[NewOrderItem]) -> f64 {
        items.iter().map(|i| i.unit_price * i.quantity).sum()
    }

    /// 计算最终金额
    ///
    /// 店员显式给出最终价时原样采用（称重定价可以与明细合计无关）；
    /// 否则按当前明细单价 × 数量重新求和。
    pub fn finalize(&self, items: &[OrderItem], supplied: Option<f64>) -> f64 {
        supplied.unwrap_or_else(|| items.iter().map(OrderItem::line_total).sum())
    }
}

impl Default for PricingReconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(unit_price: f64, quantity: f64) -> NewOrderItem {
        NewOrderItem {
            product_id: "P1".to_string(),
            quantity,
            unit: "kg".to_string(),
            unit_price,
        }
    }

    fn item(price: f64, quantity: f64) -> OrderItem {
        OrderItem {
            item_id: "I1".to_string(),
            order_id: "O1".to_string(),
            product_id: "P1".to_string(),
            quantity,
            unit: "kg".to_string(),
            price,
        }
    }

    #[test]
    fn test_estimate_sums_price_times_quantity() {
        let pricing = PricingReconciler::new();
        let total = pricing.estimate(&[new_item(18.50, 2.0), new_item(4.50, 1.0)]);
        assert!((total - 41.50).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_empty_is_zero() {
        let pricing = PricingReconciler::new();
        assert_eq!(pricing.estimate(&[]), 0.0);
    }

    #[test]
    fn test_finalize_uses_supplied_total_verbatim() {
        let pricing = PricingReconciler::new();
        // 称重后的价格可以与明细合计无关
        let total = pricing.finalize(&[item(18.50, 2.0)], Some(99.0));
        assert!((total - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_recomputes_from_items() {
        let pricing = PricingReconciler::new();
        let total = pricing.finalize(&[item(18.50, 2.0), item(4.50, 1.0)], None);
        assert!((total - 41.50).abs() < 1e-9);
    }
}
