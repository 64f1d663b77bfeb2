// ==========================================
// 门店自提预订系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、状态机白名单
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod order;
pub mod product;
pub mod slot;
pub mod store;
pub mod types;

// 重导出核心类型
pub use order::{make_order_number, ItemCorrection, NewOrder, NewOrderItem, Order, OrderItem};
pub use product::Product;
pub use slot::TimeSlot;
pub use store::Store;
pub use types::OrderStatus;
