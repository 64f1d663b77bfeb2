// ==========================================
// 门店自提预订系统 - 订单 API
// ==========================================
// 职责: 下单/查单/状态推进的编排与 DTO 映射
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::slot_api::format_view_time;
use crate::domain::order::{ItemCorrection, NewOrder, NewOrderItem, Order, OrderItem};
use crate::domain::types::OrderStatus;
use crate::engine::order_ledger::OrderLedger;
use crate::repository::order_repo::OrderRepository;

// ==========================================
// OrderApi - 订单 API
// ==========================================

/// 订单API
///
/// 职责：
/// 1. 下单（经订单生命周期引擎）
/// 2. 订单查询（单条/全量，供前台确认页与后台工作台）
/// 3. 状态推进（店员称重定价/完成/拒绝）
pub struct OrderApi {
    ledger: Arc<OrderLedger>,
    order_repo: Arc<OrderRepository>,
}

impl OrderApi {
    /// 创建新的OrderApi实例
    pub fn new(ledger: Arc<OrderLedger>, order_repo: Arc<OrderRepository>) -> Self {
        Self { ledger, order_repo }
    }

    /// 创建订单
    ///
    /// 请求中的 estimatedTotal 仅为兼容客户端请求结构而接受，
    /// 预估金额一律由服务端按提交单价快照重算（购物车不可信）。
    pub fn create_order(&self, request: CreateOrderRequest) -> ApiResult<OrderView> {
        let new_order = NewOrder {
            store_id: request.store_id,
            slot_id: request.slot_id,
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
            customer_email: request.customer_email,
            request_details: request.request_details,
            special_notes: request.special_notes,
            privacy_accepted: request.privacy_accepted.unwrap_or(false),
            items: request
                .items
                .into_iter()
                .map(|i| NewOrderItem {
                    product_id: i.product_id,
                    quantity: i.quantity,
                    unit: i.unit,
                    unit_price: i.unit_price,
                })
                .collect(),
        };

        let now = chrono::Local::now().naive_local();
        let order = self.ledger.create_order(&new_order, now)?;

        Ok(OrderView::from(order))
    }

    /// 按ID查询订单（含明细）
    pub fn get_order(&self, order_id: &str) -> ApiResult<OrderView> {
        if order_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("订单ID不能为空".to_string()));
        }

        let order = self
            .order_repo
            .find_by_id_with_items(order_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Order(id={})不存在", order_id)))?;

        Ok(OrderView::from(order))
    }

    /// 查询全部订单（后台工作台/历史），最新在前
    pub fn list_orders(&self) -> ApiResult<Vec<OrderView>> {
        let orders = self.order_repo.list_all_with_items()?;
        Ok(orders.into_iter().map(OrderView::from).collect())
    }

    /// 推进订单状态（可携带最终金额与明细修正）
    pub fn update_order(&self, order_id: &str, request: UpdateOrderRequest) -> ApiResult<OrderView> {
        if order_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("订单ID不能为空".to_string()));
        }

        let to = OrderStatus::parse(&request.status)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知订单状态: {}", request.status)))?;

        let corrections: Vec<ItemCorrection> = request
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|c| ItemCorrection {
                item_id: c.id,
                price: c.price,
                quantity: c.quantity,
            })
            .collect();

        let now = chrono::Local::now().naive_local();
        let order = self
            .ledger
            .update_status(order_id, to, request.final_total, &corrections, now)?;

        Ok(OrderView::from(order))
    }
}

// ==========================================
// 请求 DTO
// ==========================================

/// 下单请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub store_id: Option<String>,
    pub slot_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub request_details: Option<String>,
    #[serde(default)]
    pub special_notes: Option<String>,
    #[serde(default)]
    pub privacy_accepted: Option<bool>,
    /// 客户端本地估算，仅兼容接受，服务端不采用
    #[serde(default)]
    pub estimated_total: Option<f64>,
}

/// 下单明细
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
}

/// 状态推进请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: String,
    #[serde(default)]
    pub final_total: Option<f64>,
    #[serde(default)]
    pub items: Option<Vec<ItemCorrectionRequest>>,
}

/// 明细修正
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCorrectionRequest {
    pub id: String,
    pub price: f64,
    pub quantity: f64,
}

// ==========================================
// 响应 DTO
// ==========================================

/// 订单视图（对外 JSON 结构）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub order_number: String,
    pub store_id: String,
    pub slot_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub status: String,
    pub estimated_total: f64,
    pub final_total: Option<f64>,
    pub pickup_time: String,
    pub request_details: Option<String>,
    pub special_notes: Option<String>,
    pub privacy_accepted: bool,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<OrderItemView>,
}

/// 订单明细视图
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: String,
    pub product_id: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            id: order.order_id,
            order_number: order.order_number,
            store_id: order.store_id,
            slot_id: order.slot_id,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            customer_email: order.customer_email,
            status: order.status.to_string(),
            estimated_total: order.estimated_total,
            final_total: order.final_total,
            pickup_time: format_view_time(order.pickup_time),
            request_details: order.request_details,
            special_notes: order.special_notes,
            privacy_accepted: order.privacy_accepted,
            created_at: format_view_time(order.created_at),
            updated_at: format_view_time(order.updated_at),
            items: order.items.into_iter().map(OrderItemView::from).collect(),
        }
    }
}

impl From<OrderItem> for OrderItemView {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.item_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit: item.unit,
            price: item.price,
        }
    }
}
