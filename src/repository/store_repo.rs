// ==========================================
// 门店自提预订系统 - 门店数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::store::Store;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_dt, parse_dt};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// StoreRepository - 门店仓储
// ==========================================

/// 门店仓储
/// 职责: 管理 store 表的读写（门店创建后在本核心范围内不可变）
pub struct StoreRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StoreRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入门店（初始化/种子工具使用）
    pub fn insert(&self, store: &Store) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO store (
                store_id, name, slug, address, phone, email,
                slot_duration_minutes, max_orders_per_slot, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            params![
                &store.store_id,
                &store.name,
                &store.slug,
                &store.address,
                &store.phone,
                &store.email,
                &store.slot_duration_minutes,
                &store.max_orders_per_slot,
                format_dt(store.created_at),
            ],
        )?;

        Ok(())
    }

    /// 按ID查询门店
    pub fn find_by_id(&self, store_id: &str) -> RepositoryResult<Option<Store>> {
        let conn = self.get_conn()?;

        let store = conn
            .query_row(
                r#"SELECT store_id, name, slug, address, phone, email,
                          slot_duration_minutes, max_orders_per_slot, created_at
                   FROM store
                   WHERE store_id = ?1"#,
                params![store_id],
                map_store_row,
            )
            .optional()?;

        Ok(store)
    }

    /// 查询系统内最早记录的门店（单店部署下的"自动选择"）
    ///
    /// 按 rowid 取第一条——入库顺序即"最早记录"，
    /// 不依赖秒级精度的 created_at 做同刻裁决。
    pub fn find_first(&self) -> RepositoryResult<Option<Store>> {
        let conn = self.get_conn()?;

        let store = conn
            .query_row(
                r#"SELECT store_id, name, slug, address, phone, email,
                          slot_duration_minutes, max_orders_per_slot, created_at
                   FROM store
                   ORDER BY rowid ASC
                   LIMIT 1"#,
                [],
                map_store_row,
            )
            .optional()?;

        Ok(store)
    }
}

/// 行映射
fn map_store_row(row: &Row<'_>) -> rusqlite::Result<Store> {
    Ok(Store {
        store_id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        address: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        slot_duration_minutes: row.get(6)?,
        max_orders_per_slot: row.get(7)?,
        created_at: parse_dt(&row.get::<_, String>(8)?),
    })
}
