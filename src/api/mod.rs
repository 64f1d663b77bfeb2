// ==========================================
// 门店自提预订系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 HTTP 边界调用
// ==========================================

pub mod error;
pub mod order_api;
pub mod slot_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use order_api::{
    CreateOrderRequest, ItemCorrectionRequest, OrderApi, OrderItemRequest, OrderItemView,
    OrderView, UpdateOrderRequest,
};
pub use slot_api::{SlotApi, TimeSlotView};
