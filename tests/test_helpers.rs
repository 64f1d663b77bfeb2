// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、门店/时段/商品种子
// ==========================================

use std::error::Error;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::NamedTempFile;
use uuid::Uuid;

use click_collect::app::AppState;
use click_collect::domain::{Product, Store, TimeSlot};

/// 创建临时测试数据库并初始化应用状态
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - AppState: 已完成建表与装配的应用状态
pub fn create_test_state() -> Result<(NamedTempFile, Arc<AppState>), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let state = Arc::new(AppState::new(db_path)?);
    Ok((temp_file, state))
}

/// 在既有数据库文件上再开一个独立应用状态（并发测试用，各持独立连接）
pub fn open_state(db_path: &str) -> Arc<AppState> {
    Arc::new(AppState::new(db_path.to_string()).expect("打开数据库失败"))
}

/// 测试基准日：后天
///
/// 所有种子时段都落在这一天——无论测试何时运行，
/// 时段相对真实时钟恒为未来，且同属一个日历日（不受跨午夜影响）。
pub fn base_day() -> NaiveDate {
    (chrono::Local::now() + Duration::days(2)).date_naive()
}

/// 基准日内的时刻
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    base_day()
        .and_hms_opt(hour, minute, 0)
        .expect("无效的测试时刻")
}

/// 测试用"当前时刻"（真实时钟）
pub fn test_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// 种入一家测试门店
pub fn seed_store(state: &AppState, slug: &str, max_orders_per_slot: i32) -> Store {
    let store = Store {
        store_id: Uuid::new_v4().to_string(),
        name: format!("Test Store {}", slug),
        slug: slug.to_string(),
        address: None,
        phone: Some("02 0000000".to_string()),
        email: None,
        slot_duration_minutes: 30,
        max_orders_per_slot,
        created_at: test_now(),
    };
    state.store_repo.insert(&store).expect("种入门店失败");
    store
}

/// 种入基准日内指定时刻开始的时段
pub fn seed_slot(
    state: &AppState,
    store: &Store,
    hour: u32,
    minute: u32,
    max_capacity: i32,
    is_available: bool,
) -> TimeSlot {
    let start = at(hour, minute);
    let slot = TimeSlot {
        slot_id: Uuid::new_v4().to_string(),
        store_id: store.store_id.clone(),
        start_time: start,
        end_time: start + Duration::minutes(i64::from(store.slot_duration_minutes)),
        max_capacity,
        booked_count: 0,
        is_available,
    };
    state.slot_repo.insert(&slot).expect("种入时段失败");
    slot
}

/// 种入一个商品
pub fn seed_product(state: &AppState, name: &str, price_per_unit: f64) -> Product {
    let product = Product {
        product_id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        unit: "kg".to_string(),
        price_per_unit,
        created_at: test_now(),
    };
    state.product_repo.insert(&product).expect("种入商品失败");
    product
}
