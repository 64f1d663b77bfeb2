// ==========================================
// 门店自提预订系统 - 时段查询 API
// ==========================================
// 职责: 时段列表查询（只读）
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::slot::TimeSlot;
use crate::engine::slot_allocator::SlotAllocator;

/// 对外展示的时间格式（ISO 8601，无时区）
const VIEW_TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

// ==========================================
// SlotApi - 时段查询 API
// ==========================================

/// 时段查询API
pub struct SlotApi {
    allocator: Arc<SlotAllocator>,
}

impl SlotApi {
    /// 创建新的SlotApi实例
    pub fn new(allocator: Arc<SlotAllocator>) -> Self {
        Self { allocator }
    }

    /// 查询门店指定日期的可预订时段
    ///
    /// # 参数
    /// - store_id: 门店ID（必填）
    /// - date_str: 日期（YYYY-MM-DD，必填）
    ///
    /// # 返回
    /// - Ok(Vec<TimeSlotView>): 按 start_time 升序的时段列表（含已满时段）
    /// - Err(ApiError::InvalidInput): 参数缺失或格式错误
    pub fn list_slots(&self, store_id: &str, date_str: &str) -> ApiResult<Vec<TimeSlotView>> {
        if store_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("storeId 不能为空".to_string()));
        }

        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| ApiError::InvalidInput(format!("日期格式错误（应为YYYY-MM-DD）: {}", e)))?;

        let now = chrono::Local::now().naive_local();
        let slots = self.allocator.list_available(store_id, date, now)?;

        Ok(slots.into_iter().map(TimeSlotView::from).collect())
    }
}

// ==========================================
// DTO
// ==========================================

/// 时段视图（对外 JSON 结构）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotView {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
    pub booked_count: i32,
    pub max_capacity: i32,
}

impl From<TimeSlot> for TimeSlotView {
    fn from(slot: TimeSlot) -> Self {
        Self {
            id: slot.slot_id,
            start_time: slot.start_time.format(VIEW_TIME_FMT).to_string(),
            end_time: slot.end_time.format(VIEW_TIME_FMT).to_string(),
            is_available: slot.is_available,
            booked_count: slot.booked_count,
            max_capacity: slot.max_capacity,
        }
    }
}

/// 对外时间格式化（订单视图复用）
pub(crate) fn format_view_time(dt: chrono::NaiveDateTime) -> String {
    dt.format(VIEW_TIME_FMT).to_string()
}
