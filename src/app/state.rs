// ==========================================
// 门店自提预订系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::api::{OrderApi, SlotApi};
use crate::db;
use crate::engine::{FallbackResolver, OrderLedger, PricingReconciler, SlotAllocator};
use crate::repository::{
    OrderRepository, ProductRepository, StoreRepository, TimeSlotRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源，作为 HTTP 边界的全局状态注入
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 时段查询API
    pub slot_api: Arc<SlotApi>,

    /// 订单API
    pub order_api: Arc<OrderApi>,

    /// 门店仓储（种子工具使用）
    pub store_repo: Arc<StoreRepository>,

    /// 时段仓储（种子工具使用，外部排班任务的落库入口）
    pub slot_repo: Arc<TimeSlotRepository>,

    /// 商品仓储（种子工具使用）
    pub product_repo: Arc<ProductRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库连接并应用统一 PRAGMA
    /// 2. 幂等初始化表结构
    /// 3. 初始化所有 Repository / Engine / API 实例
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = db::open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        db::init_schema(&conn).context("无法初始化数据库结构")?;

        // schema 版本只做提示，不做自动迁移
        match db::read_schema_version(&conn) {
            Ok(Some(v)) if v != db::CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    "数据库 schema_version={} 与代码期望 {} 不一致",
                    v,
                    db::CURRENT_SCHEMA_VERSION
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("无法读取 schema_version: {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let store_repo = Arc::new(StoreRepository::new(conn.clone()));
        let slot_repo = Arc::new(TimeSlotRepository::new(conn.clone()));
        let product_repo = Arc::new(ProductRepository::new(conn.clone()));
        let order_repo = Arc::new(OrderRepository::new(conn.clone()));

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let allocator = Arc::new(SlotAllocator::new(slot_repo.clone()));
        let fallback = Arc::new(FallbackResolver::new(slot_repo.clone(), store_repo.clone()));
        let pricing = Arc::new(PricingReconciler::new());
        let ledger = Arc::new(OrderLedger::new(
            order_repo.clone(),
            fallback.clone(),
            pricing.clone(),
        ));

        // ==========================================
        // 初始化API层
        // ==========================================
        let slot_api = Arc::new(SlotApi::new(allocator));
        let order_api = Arc::new(OrderApi::new(ledger, order_repo));

        Ok(Self {
            db_path,
            slot_api,
            order_api,
            store_repo,
            slot_repo,
            product_repo,
        })
    }
}
