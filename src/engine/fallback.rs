// ==========================================
// 门店自提预订系统 - 时段回退解析引擎
// ==========================================
// 职责: 吸收客户端过期的时段引用
// 场景: 浏览器缓存的时段列表在提交前已被删除/关闭
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::slot::TimeSlot;
use crate::domain::store::Store;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::slot_repo::TimeSlotRepository;
use crate::repository::store_repo::StoreRepository;

// ==========================================
// FallbackResolver - 时段回退解析引擎
// ==========================================

/// 时段回退解析引擎
///
/// 职责：
/// 1. 请求的时段仍然有效时原样返回
/// 2. 失效时确定性地选取门店最早的开放时段
/// 3. 缺省门店ID解析为系统内第一家门店（单店部署假设）
pub struct FallbackResolver {
    slot_repo: Arc<TimeSlotRepository>,
    store_repo: Arc<StoreRepository>,
}

impl FallbackResolver {
    /// 创建新的FallbackResolver实例
    pub fn new(slot_repo: Arc<TimeSlotRepository>, store_repo: Arc<StoreRepository>) -> Self {
        Self {
            slot_repo,
            store_repo,
        }
    }

    /// 解析门店
    ///
    /// 缺省/空白/"auto" 的门店ID解析为系统内最早记录的门店。
    /// 多店部署时应在本核心上游显式选店，此处不做猜测。
    pub fn resolve_store(&self, store_id: Option<&str>) -> RepositoryResult<Store> {
        match store_id {
            Some(id) if !id.trim().is_empty() && id != "auto" => {
                self.store_repo
                    .find_by_id(id)?
                    .ok_or_else(|| RepositoryError::NotFound {
                        entity: "Store".to_string(),
                        id: id.to_string(),
                    })
            }
            _ => self
                .store_repo
                .find_first()?
                .ok_or_else(|| RepositoryError::NotFound {
                    entity: "Store".to_string(),
                    id: "auto".to_string(),
                }),
        }
    }

    /// 解析时段
    ///
    /// 请求的时段存在于该门店、开放且未开始时原样返回；
    /// 否则取门店最早的开放时段（start_time 升序，slot_id 定序平局）。
    ///
    /// 容量故意不在此裁决：满员的真实时段会进入预订事务，
    /// 由事务内重读给出 SlotFull——容量的唯一权威在那里。
    ///
    /// # 错误
    /// - NoSlotsAvailable: 门店无任何未来开放时段
    pub fn resolve(
        &self,
        requested_slot_id: &str,
        store_id: &str,
        now: NaiveDateTime,
    ) -> RepositoryResult<TimeSlot> {
        if let Some(slot) = self.slot_repo.find_by_id(requested_slot_id)? {
            if slot.store_id == store_id && slot.is_available && slot.start_time >= now {
                return Ok(slot);
            }
        }

        tracing::info!(
            requested_slot_id,
            store_id,
            "请求的时段已失效，回退到最早开放时段"
        );

        self.slot_repo
            .find_first_available(store_id, now)?
            .ok_or_else(|| RepositoryError::NoSlotsAvailable {
                store_id: store_id.to_string(),
            })
    }
}
