// ==========================================
// 门店自提预订系统 - 演示数据种子工具
// ==========================================
// 职责: 建库 + 种入一家门店、商品目录、次日时段网格
// 说明: 时段批量生成在生产中由外部排班任务承担，此工具代行其职
// 用法: seed_demo_store [db_path]
// ==========================================

use std::error::Error;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local};
use uuid::Uuid;

use click_collect::config::default_db_path;
use click_collect::db::{init_schema, open_sqlite_connection};
use click_collect::domain::{Product, Store, TimeSlot};
use click_collect::repository::{ProductRepository, StoreRepository, TimeSlotRepository};

/// 营业开始小时
const OPEN_HOUR: u32 = 9;
/// 营业结束小时
const CLOSE_HOUR: u32 = 18;

fn main() -> Result<(), Box<dyn Error>> {
    click_collect::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(default_db_path);
    tracing::info!("种子数据库: {}", db_path);

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    // 清理旧数据，保证种子可重复执行
    conn.execute_batch(
        r#"
        DELETE FROM order_item;
        DELETE FROM orders;
        DELETE FROM order_counter;
        DELETE FROM time_slot;
        DELETE FROM product;
        DELETE FROM store;
        "#,
    )?;

    let conn = Arc::new(Mutex::new(conn));
    let store_repo = StoreRepository::new(conn.clone());
    let slot_repo = TimeSlotRepository::new(conn.clone());
    let product_repo = ProductRepository::new(conn.clone());

    let now = Local::now().naive_local();

    // 1. 门店
    let store = Store {
        store_id: Uuid::new_v4().to_string(),
        name: "Click & Collect - Milano Centro".to_string(),
        slug: "milano-centro".to_string(),
        address: Some("Piazza del Duomo, 1, 20121 Milano".to_string()),
        phone: Some("+39 02 12345678".to_string()),
        email: Some("milano@store.com".to_string()),
        slot_duration_minutes: 30,
        max_orders_per_slot: 5,
        created_at: now,
    };
    store_repo.insert(&store)?;
    tracing::info!("门店已创建: {}", store.name);

    // 2. 商品目录（鲜货按重计价，最终价以称重为准）
    let catalog = [
        ("Cozze", "kg", 4.50),
        ("Orata", "kg", 18.50),
        ("Branzino", "kg", 16.00),
        ("Gamberi Rossi", "kg", 36.00),
        ("Vongole Veraci", "kg", 12.50),
        ("Polpo", "kg", 14.00),
    ];
    for (name, unit, price) in catalog {
        product_repo.insert(&Product {
            product_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            price_per_unit: price,
            created_at: now,
        })?;
    }
    tracing::info!("商品目录已种入: {} 条", product_repo.list_all()?.len());

    // 3. 次日时段网格（营业时间内按门店时段时长切片）
    let tomorrow = now.date() + Duration::days(1);
    let open = tomorrow
        .and_hms_opt(OPEN_HOUR, 0, 0)
        .ok_or("无效的营业开始时间")?;
    let close = tomorrow
        .and_hms_opt(CLOSE_HOUR, 0, 0)
        .ok_or("无效的营业结束时间")?;

    let mut slots = Vec::new();
    let mut start = open;
    while start < close {
        let end = start + Duration::minutes(i64::from(store.slot_duration_minutes));
        slots.push(TimeSlot {
            slot_id: Uuid::new_v4().to_string(),
            store_id: store.store_id.clone(),
            start_time: start,
            end_time: end,
            max_capacity: store.max_orders_per_slot,
            booked_count: 0,
            is_available: true,
        });
        start = end;
    }

    let count = slot_repo.insert_batch(&slots)?;
    tracing::info!("已生成 {} 个次日时段 ({})", count, tomorrow);

    tracing::info!("种子完成");
    Ok(())
}
