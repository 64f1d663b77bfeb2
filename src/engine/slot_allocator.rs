// ==========================================
// 门店自提预订系统 - 时段容量分配引擎
// ==========================================
// 职责: 暴露可预订库存，保证容量永不超卖
// 红线: 容量只增不减——订单被拒绝也不回收名额
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::slot::TimeSlot;
use crate::repository::error::RepositoryResult;
use crate::repository::slot_repo::TimeSlotRepository;

// ==========================================
// SlotAllocator - 时段容量分配引擎
// ==========================================

/// 时段容量分配引擎
pub struct SlotAllocator {
    slot_repo: Arc<TimeSlotRepository>,
}

impl SlotAllocator {
    /// 创建新的SlotAllocator实例
    pub fn new(slot_repo: Arc<TimeSlotRepository>) -> Self {
        Self { slot_repo }
    }

    /// 列出门店指定日期的可预订时段
    ///
    /// 开放、当天、且尚未开始的时段，按 start_time 升序。
    /// 每次调用重新查询——列表是无锁读，结果允许在预订前变陈旧，
    /// 超卖由预订事务的重读拦截，而不是由这里加锁。
    pub fn list_available(
        &self,
        store_id: &str,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<TimeSlot>> {
        let slots = self.slot_repo.find_available_by_date(store_id, date, now)?;

        tracing::debug!(store_id, %date, count = slots.len(), "时段列表查询");
        Ok(slots)
    }

    /// 预订时段（事务内重读容量后递增）
    ///
    /// # 错误
    /// - NotFound: 时段不存在
    /// - SlotFull: 已满或未开放（booked_count 保持不变）
    pub fn reserve(&self, slot_id: &str) -> RepositoryResult<TimeSlot> {
        let slot = self.slot_repo.reserve(slot_id)?;

        tracing::info!(
            slot_id,
            booked_count = slot.booked_count,
            max_capacity = slot.max_capacity,
            "时段预订成功"
        );
        Ok(slot)
    }
}
