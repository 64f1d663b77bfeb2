// ==========================================
// 门店自提预订系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + Salvo
// 系统定位: 时段容量预订与订单生命周期账本
// (页面渲染/商品目录维护/登录会话由外部协作方承担)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 数据库基础设施（连接初始化/PRAGMA/建表统一）
pub mod db;

// 配置层 - 进程配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 边界集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::OrderStatus;

// 领域实体
pub use domain::{Order, OrderItem, Product, Store, TimeSlot};

// 引擎
pub use engine::{FallbackResolver, OrderLedger, PricingReconciler, SlotAllocator};

// API
pub use api::{OrderApi, SlotApi};

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
