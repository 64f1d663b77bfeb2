// ==========================================
// 门店自提预订系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一建表入口，保证测试库与生产库结构一致
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库结构（幂等）
///
/// 表清单：
/// - store         门店（时段时长/单时段并发上限）
/// - time_slot     自提时段（容量计数，预订只增不减）
/// - product       商品目录（外部维护，本核心只读引用）
/// - orders        订单（状态机 + 金额）
/// - order_item    订单明细（随订单同事务创建，级联删除）
/// - order_counter 订单序号（按门店单调递增，事务内分配）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS store (
            store_id              TEXT PRIMARY KEY,
            name                  TEXT NOT NULL,
            slug                  TEXT NOT NULL UNIQUE,
            address               TEXT,
            phone                 TEXT,
            email                 TEXT,
            slot_duration_minutes INTEGER NOT NULL,
            max_orders_per_slot   INTEGER NOT NULL,
            created_at            TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS time_slot (
            slot_id      TEXT PRIMARY KEY,
            store_id     TEXT NOT NULL REFERENCES store(store_id),
            start_time   TEXT NOT NULL,
            end_time     TEXT NOT NULL,
            max_capacity INTEGER NOT NULL,
            booked_count INTEGER NOT NULL DEFAULT 0,
            is_available INTEGER NOT NULL DEFAULT 1,
            CHECK (booked_count >= 0 AND booked_count <= max_capacity)
        );

        CREATE INDEX IF NOT EXISTS idx_time_slot_store_start
            ON time_slot(store_id, start_time);

        CREATE TABLE IF NOT EXISTS product (
            product_id     TEXT PRIMARY KEY,
            name           TEXT NOT NULL,
            unit           TEXT NOT NULL,
            price_per_unit REAL NOT NULL,
            created_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS orders (
            order_id         TEXT PRIMARY KEY,
            order_number     TEXT NOT NULL UNIQUE,
            store_id         TEXT NOT NULL REFERENCES store(store_id),
            slot_id          TEXT NOT NULL REFERENCES time_slot(slot_id),
            customer_name    TEXT NOT NULL,
            customer_phone   TEXT NOT NULL,
            customer_email   TEXT,
            status           TEXT NOT NULL DEFAULT 'PENDING',
            estimated_total  REAL NOT NULL,
            final_total      REAL,
            pickup_time      TEXT NOT NULL,
            request_details  TEXT,
            special_notes    TEXT,
            privacy_accepted INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_orders_created_at
            ON orders(created_at);

        CREATE TABLE IF NOT EXISTS order_item (
            item_id    TEXT PRIMARY KEY,
            order_id   TEXT NOT NULL REFERENCES orders(order_id) ON DELETE CASCADE,
            product_id TEXT NOT NULL REFERENCES product(product_id),
            quantity   REAL NOT NULL,
            unit       TEXT NOT NULL,
            price      REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_order_item_order
            ON order_item(order_id);

        CREATE TABLE IF NOT EXISTS order_counter (
            store_id TEXT PRIMARY KEY REFERENCES store(store_id),
            next_seq INTEGER NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
