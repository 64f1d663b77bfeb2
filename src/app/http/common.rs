// ==========================================
// 公共工具：错误映射
// ==========================================
// 错误分层:
// - 4xx: 调用方可理解并处理的业务错误，消息原样透出
// - 5xx: 未预期错误，消息统一模糊化，完整细节只进服务端日志
// ==========================================

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::Response;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;

/// 错误响应（返回给调用方）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ErrorResponse {
    /// 错误消息
    pub error: String,
}

/// 将ApiError渲染为 HTTP 响应
pub(crate) fn render_api_error(res: &mut Response, err: ApiError) {
    let status = match &err {
        ApiError::InvalidInput(_)
        | ApiError::ValidationError(_)
        | ApiError::SlotFull(_)
        | ApiError::NoSlotsAvailable(_)
        | ApiError::StaleProduct(_)
        | ApiError::InvalidStateTransition { .. }
        | ApiError::BusinessRuleViolation(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::DatabaseError(_)
        | ApiError::DatabaseConnectionError(_)
        | ApiError::DatabaseTransactionError(_)
        | ApiError::InternalError(_)
        | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("未预期的内部错误: {:?}", err);
        "服务器内部错误".to_string()
    } else {
        err.to_string()
    };

    res.status_code(status);
    res.render(Json(ErrorResponse { error: message }));
}

/// 渲染内部错误（应用状态缺失等框架级故障）
pub(crate) fn render_internal_error(res: &mut Response, detail: &str) {
    tracing::error!("HTTP 边界内部错误: {}", detail);
    res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
    res.render(Json(ErrorResponse {
        error: "服务器内部错误".to_string(),
    }));
}
