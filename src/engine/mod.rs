// ==========================================
// 门店自提预订系统 - 引擎层
// ==========================================
// 职责: 业务规则（容量分配/回退解析/订单生命周期/金额核算）
// 红线: 引擎不直接拼 SQL,数据访问一律经由仓储层
// ==========================================

pub mod fallback;
pub mod order_ledger;
pub mod pricing;
pub mod slot_allocator;

// 重导出核心引擎
pub use fallback::FallbackResolver;
pub use order_ledger::OrderLedger;
pub use pricing::PricingReconciler;
pub use slot_allocator::SlotAllocator;
