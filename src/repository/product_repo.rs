// ==========================================
// 门店自提预订系统 - 商品数据仓储
// ==========================================
// 商品目录由外部后台维护；本核心只做引用校验与只读查询
// ==========================================

use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_dt, parse_dt};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 商品仓储
// ==========================================

/// 商品仓储
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
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

    /// 插入商品（种子工具/测试使用）
    pub fn insert(&self, product: &Product) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO product (product_id, name, unit, price_per_unit, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                &product.product_id,
                &product.name,
                &product.unit,
                &product.price_per_unit,
                format_dt(product.created_at),
            ],
        )?;

        Ok(())
    }

    /// 按ID查询商品
    pub fn find_by_id(&self, product_id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;

        let product = conn
            .query_row(
                r#"SELECT product_id, name, unit, price_per_unit, created_at
                   FROM product
                   WHERE product_id = ?1"#,
                params![product_id],
                map_product_row,
            )
            .optional()?;

        Ok(product)
    }

    /// 查询全部商品
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT product_id, name, unit, price_per_unit, created_at
               FROM product
               ORDER BY name ASC"#,
        )?;

        let products = stmt
            .query_map([], map_product_row)?
            .collect::<rusqlite::Result<Vec<Product>>>()?;

        Ok(products)
    }
}

/// 事务内校验商品引用是否仍然存在
///
/// 购物车是客户端本地持久化的不可信输入，商品可能在提交前已被目录删除；
/// 该校验必须与订单写入处于同一事务。
pub(crate) fn product_exists_in_tx(conn: &Connection, product_id: &str) -> RepositoryResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM product WHERE product_id = ?1",
            params![product_id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(found.is_some())
}

/// 行映射
fn map_product_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        product_id: row.get(0)?,
        name: row.get(1)?,
        unit: row.get(2)?,
        price_per_unit: row.get(3)?,
        created_at: parse_dt(&row.get::<_, String>(4)?),
    })
}
