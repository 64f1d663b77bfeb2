// ==========================================
// 门店自提预订系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 状态机: PENDING -> READY -> COMPLETED
//         PENDING/READY -> REJECTED
// 红线: 终态不可再变更，转换前必须走 can_transition_to 白名单
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,   // 待确认（顾客已提交，等待称重定价）
    Ready,     // 已备货（店员确认重量与价格）
    Completed, // 已完成（顾客到店付款取货）
    Rejected,  // 已拒绝（备货前或定价后取消）
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Ready => write!(f, "READY"),
            OrderStatus::Completed => write!(f, "COMPLETED"),
            OrderStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl OrderStatus {
    /// 从字符串解析状态（未知取值返回 None，由调用方拒绝）
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(OrderStatus::Pending),
            "READY" => Some(OrderStatus::Ready),
            "COMPLETED" => Some(OrderStatus::Completed),
            "REJECTED" => Some(OrderStatus::Rejected),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Rejected => "REJECTED",
        }
    }

    /// 判断是否为终态（终态订单不允许任何再转换/明细修正）
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Rejected)
    }

    /// 状态转换白名单
    ///
    /// | From    | To        | 触发场景               |
    /// |---------|-----------|------------------------|
    /// | PENDING | READY     | 店员确认称重与价格     |
    /// | PENDING | REJECTED  | 备货前取消             |
    /// | READY   | COMPLETED | 顾客付款取货           |
    /// | READY   | REJECTED  | 定价后取消             |
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::Ready)
                | (OrderStatus::Pending, OrderStatus::Rejected)
                | (OrderStatus::Ready, OrderStatus::Completed)
                | (OrderStatus::Ready, OrderStatus::Rejected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_whitelist() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Rejected));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Rejected));

        // 终态不可转出
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Rejected));
        assert!(!OrderStatus::Rejected.can_transition_to(OrderStatus::Pending));

        // 不允许跳级/回退/自转换
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_parse_and_db_str_roundtrip() {
        for s in ["PENDING", "READY", "COMPLETED", "REJECTED"] {
            let status = OrderStatus::parse(s).unwrap();
            assert_eq!(status.to_db_str(), s);
        }
        assert!(OrderStatus::parse("SHIPPED").is_none());
        assert_eq!(OrderStatus::parse("ready"), Some(OrderStatus::Ready));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }
}
