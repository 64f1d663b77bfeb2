// ==========================================
// 订单相关端点
// ==========================================

use std::sync::Arc;

use salvo::prelude::*;

use crate::api::error::ApiError;
use crate::api::order_api::{CreateOrderRequest, UpdateOrderRequest};
use crate::app::http::common::{render_api_error, render_internal_error};
use crate::app::state::AppState;

/// POST /orders
///
/// 下单：校验购物车、解析门店/时段、预订+建单单事务落库。
/// 成功返回 201 与完整订单（含明细）。
#[handler]
pub async fn create_order(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Ok(state) = depot.obtain::<Arc<AppState>>() else {
        return render_internal_error(res, "应用状态未注入");
    };

    let request = match req.parse_json::<CreateOrderRequest>().await {
        Ok(request) => request,
        Err(e) => {
            return render_api_error(
                res,
                ApiError::InvalidInput(format!("请求体格式错误: {}", e)),
            );
        }
    };

    match state.order_api.create_order(request) {
        Ok(order) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(order));
        }
        Err(err) => render_api_error(res, err),
    }
}

/// GET /orders
///
/// 后台工作台/历史：全部订单（含明细），最新在前。
#[handler]
pub async fn list_orders(depot: &mut Depot, res: &mut Response) {
    let Ok(state) = depot.obtain::<Arc<AppState>>() else {
        return render_internal_error(res, "应用状态未注入");
    };

    match state.order_api.list_orders() {
        Ok(orders) => res.render(Json(orders)),
        Err(err) => render_api_error(res, err),
    }
}

/// GET /orders/{id}
#[handler]
pub async fn get_order(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Ok(state) = depot.obtain::<Arc<AppState>>() else {
        return render_internal_error(res, "应用状态未注入");
    };

    let Some(order_id) = req.param::<String>("id") else {
        return render_api_error(res, ApiError::InvalidInput("缺少订单ID".to_string()));
    };

    match state.order_api.get_order(&order_id) {
        Ok(order) => res.render(Json(order)),
        Err(err) => render_api_error(res, err),
    }
}

/// PUT /orders/{id}
///
/// 店员推进订单状态（可携带最终金额与明细修正）。
#[handler]
pub async fn update_order(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Ok(state) = depot.obtain::<Arc<AppState>>() else {
        return render_internal_error(res, "应用状态未注入");
    };

    let Some(order_id) = req.param::<String>("id") else {
        return render_api_error(res, ApiError::InvalidInput("缺少订单ID".to_string()));
    };

    let request = match req.parse_json::<UpdateOrderRequest>().await {
        Ok(request) => request,
        Err(e) => {
            return render_api_error(
                res,
                ApiError::InvalidInput(format!("请求体格式错误: {}", e)),
            );
        }
    };

    match state.order_api.update_order(&order_id, request) {
        Ok(order) => res.render(Json(order)),
        Err(err) => render_api_error(res, err),
    }
}
