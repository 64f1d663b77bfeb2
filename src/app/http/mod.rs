// ==========================================
// 门店自提预订系统 - HTTP 端点层
// ==========================================
// 职责: 路由装配与请求/响应 JSON 映射
// 错误契约: 4xx 返回 {"error": 消息}，5xx 统一模糊消息并记录日志
// ==========================================

pub mod common;
pub mod orders;
pub mod slots;

use std::sync::Arc;

use salvo::affix_state;
use salvo::Router;

use crate::app::state::AppState;

/// 装配应用路由
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .hoop(affix_state::inject(state))
        .push(Router::with_path("slots").get(slots::list_slots))
        .push(
            Router::with_path("orders")
                .get(orders::list_orders)
                .post(orders::create_order)
                .push(
                    Router::with_path("{id}")
                        .get(orders::get_order)
                        .put(orders::update_order),
                ),
        )
}
