// ==========================================
// 门店自提预订系统 - 订单生命周期引擎
// ==========================================
// 职责: 订单的创建与状态推进
// 红线: 状态转换必须过白名单；多步写入必须单事务
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::order::{ItemCorrection, NewOrder, Order, OrderItem};
use crate::domain::types::OrderStatus;
use crate::engine::fallback::FallbackResolver;
use crate::engine::pricing::PricingReconciler;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_repo::OrderRepository;

// ==========================================
// OrderLedger - 订单生命周期引擎
// ==========================================

/// 订单生命周期引擎
///
/// 职责：
/// 1. 下单请求校验（购物车是不可信输入）
/// 2. 门店/时段解析（经回退解析引擎）
/// 3. 预订+建单复合事务的编排
/// 4. 状态机白名单校验与状态推进
pub struct OrderLedger {
    order_repo: Arc<OrderRepository>,
    fallback: Arc<FallbackResolver>,
    pricing: Arc<PricingReconciler>,
}

impl OrderLedger {
    /// 创建新的OrderLedger实例
    pub fn new(
        order_repo: Arc<OrderRepository>,
        fallback: Arc<FallbackResolver>,
        pricing: Arc<PricingReconciler>,
    ) -> Self {
        Self {
            order_repo,
            fallback,
            pricing,
        }
    }

    /// 创建订单
    ///
    /// # 流程
    /// 1. 校验顾客字段与明细输入
    /// 2. 解析门店与时段（失效时段由回退解析引擎兜底）
    /// 3. 计算预估金额（服务端按提交单价快照求和，客户端合计一律不信）
    /// 4. 预订+建单单事务落库（容量重读/订单号分配/商品引用校验见仓储层）
    ///
    /// # 错误
    /// - ValidationError: 必填字段缺失、明细为空或数值非法
    /// - SlotFull: 解析出的时段在事务内被并发占满
    /// - StaleProduct: 明细引用的商品已不存在（整单回滚）
    /// - NoSlotsAvailable: 门店已无任何未来开放时段
    pub fn create_order(&self, new_order: &NewOrder, now: NaiveDateTime) -> RepositoryResult<Order> {
        validate_new_order(new_order)?;

        let store = self.fallback.resolve_store(new_order.store_id.as_deref())?;
        let slot = self.fallback.resolve(&new_order.slot_id, &store.store_id, now)?;

        let estimated_total = self.pricing.estimate(&new_order.items);

        let order = self.order_repo.create_with_slot_reservation(
            new_order,
            &store,
            &slot.slot_id,
            estimated_total,
            now,
        )?;

        tracing::info!(
            order_number = %order.order_number,
            slot_id = %order.slot_id,
            items = order.items.len(),
            estimated_total,
            "订单创建成功"
        );

        Ok(order)
    }

    /// 推进订单状态（可携带明细修正与最终金额）
    ///
    /// # 流程
    /// 1. 读取订单，校验 (当前状态, 目标状态) 在转换白名单内
    /// 2. 校验明细修正（必须属于该订单，数值合法）
    /// 3. 计算最终金额（店员显式给出时原样采用，否则按修正后明细重算）
    /// 4. 守卫式更新落库（修正与状态变更同事务；并发转换只有一方成功）
    ///
    /// 终态（COMPLETED/REJECTED）不在任何白名单的 from 侧，
    /// 因此终态后的明细修正天然不可达。
    ///
    /// # 错误
    /// - NotFound: 订单不存在，或修正引用了不属于该订单的明细
    /// - InvalidStateTransition: 转换不在白名单内（或被并发抢先）
    /// - ValidationError: 修正/最终金额数值非法
    pub fn update_status(
        &self,
        order_id: &str,
        to: OrderStatus,
        supplied_final: Option<f64>,
        corrections: &[ItemCorrection],
        now: NaiveDateTime,
    ) -> RepositoryResult<Order> {
        let order = self
            .order_repo
            .find_by_id_with_items(order_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Order".to_string(),
                id: order_id.to_string(),
            })?;

        if !order.status.can_transition_to(to) {
            return Err(RepositoryError::InvalidStateTransition {
                from: order.status.to_string(),
                to: to.to_string(),
            });
        }

        validate_corrections(&order.items, corrections)?;

        if let Some(total) = supplied_final {
            if !total.is_finite() || total < 0.0 {
                return Err(RepositoryError::ValidationError(format!(
                    "最终金额非法: {}",
                    total
                )));
            }
        }

        // 修正后的明细视图（仅用于金额重算；落库在事务内进行）
        let corrected_items = apply_corrections(&order.items, corrections);
        let final_total = self.pricing.finalize(&corrected_items, supplied_final);

        let updated = self.order_repo.update_status_guarded(
            order_id,
            order.status,
            to,
            final_total,
            corrections,
            now,
        )?;

        tracing::info!(
            order_number = %updated.order_number,
            from = %order.status,
            to = %to,
            final_total,
            corrections = corrections.len(),
            "订单状态推进"
        );

        Ok(updated)
    }
}

/// 下单请求校验
fn validate_new_order(new_order: &NewOrder) -> RepositoryResult<()> {
    if new_order.customer_name.trim().is_empty() {
        return Err(RepositoryError::ValidationError(
            "顾客姓名不能为空".to_string(),
        ));
    }
    if new_order.customer_phone.trim().is_empty() {
        return Err(RepositoryError::ValidationError(
            "顾客电话不能为空".to_string(),
        ));
    }
    if new_order.items.is_empty() {
        return Err(RepositoryError::ValidationError(
            "订单明细不能为空".to_string(),
        ));
    }

    for item in &new_order.items {
        if item.product_id.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "明细缺少商品ID".to_string(),
            ));
        }
        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            return Err(RepositoryError::ValidationError(format!(
                "明细数量非法: product_id={}, quantity={}",
                item.product_id, item.quantity
            )));
        }
        if !item.unit_price.is_finite() || item.unit_price < 0.0 {
            return Err(RepositoryError::ValidationError(format!(
                "明细单价非法: product_id={}, unit_price={}",
                item.product_id, item.unit_price
            )));
        }
    }

    Ok(())
}

/// 明细修正校验（归属 + 数值）
fn validate_corrections(
    items: &[OrderItem],
    corrections: &[ItemCorrection],
) -> RepositoryResult<()> {
    for correction in corrections {
        if !items.iter().any(|i| i.item_id == correction.item_id) {
            return Err(RepositoryError::NotFound {
                entity: "OrderItem".to_string(),
                id: correction.item_id.clone(),
            });
        }
        if !correction.quantity.is_finite() || correction.quantity <= 0.0 {
            return Err(RepositoryError::ValidationError(format!(
                "修正数量非法: item_id={}, quantity={}",
                correction.item_id, correction.quantity
            )));
        }
        if !correction.price.is_finite() || correction.price < 0.0 {
            return Err(RepositoryError::ValidationError(format!(
                "修正单价非法: item_id={}, price={}",
                correction.item_id, correction.price
            )));
        }
    }

    Ok(())
}

/// 在内存中应用修正，得到金额重算用的明细视图
fn apply_corrections(items: &[OrderItem], corrections: &[ItemCorrection]) -> Vec<OrderItem> {
    let mut corrected: Vec<OrderItem> = items.to_vec();

    for correction in corrections {
        if let Some(item) = corrected.iter_mut().find(|i| i.item_id == correction.item_id) {
            item.price = correction.price;
            item.quantity = correction.quantity;
        }
    }

    corrected
}
