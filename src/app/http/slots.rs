// ==========================================
// 时段查询相关端点
// ==========================================

use std::sync::Arc;

use salvo::prelude::*;

use crate::api::error::ApiError;
use crate::app::http::common::{render_api_error, render_internal_error};
use crate::app::state::AppState;

/// GET /slots?storeId=&date=YYYY-MM-DD
///
/// 返回门店当日尚未开始的开放时段，按 start_time 升序；
/// 参数缺失或格式错误返回 400。
#[handler]
pub async fn list_slots(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Ok(state) = depot.obtain::<Arc<AppState>>() else {
        return render_internal_error(res, "应用状态未注入");
    };

    let store_id = req.query::<String>("storeId");
    let date = req.query::<String>("date");

    let (Some(store_id), Some(date)) = (store_id, date) else {
        return render_api_error(
            res,
            ApiError::InvalidInput("storeId 与 date 为必填参数".to_string()),
        );
    };

    match state.slot_api.list_slots(&store_id, &date) {
        Ok(slots) => res.render(Json(slots)),
        Err(err) => render_api_error(res, err),
    }
}
