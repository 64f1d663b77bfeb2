// ==========================================
// 门店自提预订系统 - 订单数据仓储
// ==========================================
// 并发控制:
// - 预订+建单在单个 IMMEDIATE 事务内完成（容量重读见 slot_repo）
// - 状态变更带前置状态守卫（乐观锁思路），并发转换只有一方成功
// - 订单号序号在建单事务内分配，同一毫秒并发创建不会碰撞
// ==========================================

use crate::domain::order::{make_order_number, ItemCorrection, NewOrder, Order, OrderItem};
use crate::domain::store::Store;
use crate::domain::types::OrderStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{format_dt, parse_dt};
use crate::repository::{product_repo, slot_repo};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// OrderRepository - 订单仓储
// ==========================================

/// 订单仓储
/// 职责: 订单及其明细的事务性读写
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
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

    /// 预订时段并创建订单（单事务）
    ///
    /// 事务步骤:
    /// 1. 重读并递增时段容量（满员则 SlotFull，整体回滚）
    /// 2. 分配门店内单调订单序号，生成订单号
    /// 3. 校验每个商品引用（缺失则 StaleProduct，整体回滚）
    /// 4. 写入订单行（status=PENDING，pickup_time 取时段 start_time）
    /// 5. 写入全部明细行
    ///
    /// 任一步失败不会留下半成品订单。
    ///
    /// # 参数
    /// - new_order: 已通过引擎校验的下单请求
    /// - store: 已解析的门店（订单号前缀与序号作用域）
    /// - slot_id: 已解析的时段ID（事务内重新预订）
    /// - estimated_total: 预估金额（提交单价快照之和）
    /// - now: 创建时间
    pub fn create_with_slot_reservation(
        &self,
        new_order: &NewOrder,
        store: &Store,
        slot_id: &str,
        estimated_total: f64,
        now: NaiveDateTime,
    ) -> RepositoryResult<Order> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // 1. 容量重读 + 递增
        let slot = slot_repo::reserve_slot_in_tx(&tx, slot_id)?;

        // 2. 订单号（序号分配与建单同事务）
        let seq = next_order_seq_in_tx(&tx, &store.store_id)?;
        let order_number = make_order_number(&store.slug, seq);

        // 3. 商品引用校验
        for item in &new_order.items {
            if !product_repo::product_exists_in_tx(&tx, &item.product_id)? {
                return Err(RepositoryError::StaleProduct {
                    product_id: item.product_id.clone(),
                });
            }
        }

        // 4. 订单行
        let order_id = Uuid::new_v4().to_string();
        tx.execute(
            r#"INSERT INTO orders (
                order_id, order_number, store_id, slot_id,
                customer_name, customer_phone, customer_email,
                status, estimated_total, final_total, pickup_time,
                request_details, special_notes, privacy_accepted,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, ?10, ?11, ?12, ?13, ?14, ?15)"#,
            params![
                &order_id,
                &order_number,
                &store.store_id,
                &slot.slot_id,
                &new_order.customer_name,
                &new_order.customer_phone,
                &new_order.customer_email,
                OrderStatus::Pending.to_db_str(),
                estimated_total,
                format_dt(slot.start_time),
                &new_order.request_details,
                &new_order.special_notes,
                new_order.privacy_accepted as i32,
                format_dt(now),
                format_dt(now),
            ],
        )?;

        // 5. 明细行
        let mut items = Vec::with_capacity(new_order.items.len());
        for input in &new_order.items {
            let item = OrderItem {
                item_id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: input.product_id.clone(),
                quantity: input.quantity,
                unit: input.unit.clone(),
                price: input.unit_price,
            };

            tx.execute(
                r#"INSERT INTO order_item (item_id, order_id, product_id, quantity, unit, price)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                params![
                    &item.item_id,
                    &item.order_id,
                    &item.product_id,
                    &item.quantity,
                    &item.unit,
                    &item.price,
                ],
            )?;

            items.push(item);
        }

        tx.commit()?;

        Ok(Order {
            order_id,
            order_number,
            store_id: store.store_id.clone(),
            slot_id: slot.slot_id,
            customer_name: new_order.customer_name.clone(),
            customer_phone: new_order.customer_phone.clone(),
            customer_email: new_order.customer_email.clone(),
            status: OrderStatus::Pending,
            estimated_total,
            final_total: None,
            pickup_time: slot.start_time,
            request_details: new_order.request_details.clone(),
            special_notes: new_order.special_notes.clone(),
            privacy_accepted: new_order.privacy_accepted,
            created_at: now,
            updated_at: now,
            items,
        })
    }

    /// 按ID查询订单（含明细）
    pub fn find_by_id_with_items(&self, order_id: &str) -> RepositoryResult<Option<Order>> {
        let conn = self.get_conn()?;

        let order = conn
            .query_row(
                &format!("{} WHERE order_id = ?1", SELECT_ORDER),
                params![order_id],
                map_order_row,
            )
            .optional()?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            r#"SELECT item_id, order_id, product_id, quantity, unit, price
               FROM order_item
               WHERE order_id = ?1
               ORDER BY item_id ASC"#,
        )?;

        order.items = stmt
            .query_map(params![order_id], map_item_row)?
            .collect::<rusqlite::Result<Vec<OrderItem>>>()?;

        Ok(Some(order))
    }

    /// 查询全部订单（含明细），最新在前
    pub fn list_all_with_items(&self) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare(&format!("{} ORDER BY created_at DESC, order_number DESC", SELECT_ORDER))?;

        let mut orders = stmt
            .query_map([], map_order_row)?
            .collect::<rusqlite::Result<Vec<Order>>>()?;

        // 明细一次性取回，按订单分组，避免逐单回表
        let mut stmt = conn.prepare(
            r#"SELECT item_id, order_id, product_id, quantity, unit, price
               FROM order_item
               ORDER BY item_id ASC"#,
        )?;

        let mut items_by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for item in stmt.query_map([], map_item_row)? {
            let item = item?;
            items_by_order.entry(item.order_id.clone()).or_default().push(item);
        }

        for order in &mut orders {
            if let Some(items) = items_by_order.remove(&order.order_id) {
                order.items = items;
            }
        }

        Ok(orders)
    }

    /// 带前置状态守卫的状态变更（明细修正同事务）
    ///
    /// # 并发控制
    /// UPDATE ... WHERE status = from：并发的两次转换只有一方命中守卫，
    /// 另一方得到 InvalidStateTransition（携带数据库中的实际状态）。
    ///
    /// # 事务步骤
    /// 1. 应用明细修正（明细必须属于该订单，否则 NotFound 整体回滚）
    /// 2. 守卫式状态 + 最终金额更新
    ///
    /// # 错误
    /// - NotFound: 订单/明细不存在
    /// - InvalidStateTransition: 守卫未命中（状态已被并发变更）
    pub fn update_status_guarded(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        final_total: f64,
        corrections: &[ItemCorrection],
        now: NaiveDateTime,
    ) -> RepositoryResult<Order> {
        {
            let mut conn = self.get_conn()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            // 1. 明细修正
            for correction in corrections {
                let affected = tx.execute(
                    r#"UPDATE order_item
                       SET price = ?1, quantity = ?2
                       WHERE item_id = ?3 AND order_id = ?4"#,
                    params![
                        correction.price,
                        correction.quantity,
                        &correction.item_id,
                        order_id
                    ],
                )?;

                if affected == 0 {
                    return Err(RepositoryError::NotFound {
                        entity: "OrderItem".to_string(),
                        id: correction.item_id.clone(),
                    });
                }
            }

            // 2. 守卫式状态变更
            let affected = tx.execute(
                r#"UPDATE orders
                   SET status = ?1, final_total = ?2, updated_at = ?3
                   WHERE order_id = ?4 AND status = ?5"#,
                params![
                    to.to_db_str(),
                    final_total,
                    format_dt(now),
                    order_id,
                    from.to_db_str()
                ],
            )?;

            if affected == 0 {
                // 区分记录不存在与并发状态冲突
                let actual: Option<String> = tx
                    .query_row(
                        "SELECT status FROM orders WHERE order_id = ?1",
                        params![order_id],
                        |row| row.get(0),
                    )
                    .optional()?;

                return match actual {
                    Some(actual) => Err(RepositoryError::InvalidStateTransition {
                        from: actual,
                        to: to.to_string(),
                    }),
                    None => Err(RepositoryError::NotFound {
                        entity: "Order".to_string(),
                        id: order_id.to_string(),
                    }),
                };
            }

            tx.commit()?;
        }

        self.find_by_id_with_items(order_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Order".to_string(),
                id: order_id.to_string(),
            })
    }
}

/// 订单查询列清单（与 map_order_row 对齐）
const SELECT_ORDER: &str = r#"SELECT order_id, order_number, store_id, slot_id,
       customer_name, customer_phone, customer_email,
       status, estimated_total, final_total, pickup_time,
       request_details, special_notes, privacy_accepted,
       created_at, updated_at
FROM orders"#;

/// 事务内分配门店订单序号（单调递增）
fn next_order_seq_in_tx(conn: &Connection, store_id: &str) -> RepositoryResult<i64> {
    let current: Option<i64> = conn
        .query_row(
            "SELECT next_seq FROM order_counter WHERE store_id = ?1",
            params![store_id],
            |row| row.get(0),
        )
        .optional()?;

    match current {
        Some(seq) => {
            conn.execute(
                "UPDATE order_counter SET next_seq = next_seq + 1 WHERE store_id = ?1",
                params![store_id],
            )?;
            Ok(seq)
        }
        None => {
            conn.execute(
                "INSERT INTO order_counter (store_id, next_seq) VALUES (?1, 2)",
                params![store_id],
            )?;
            Ok(1)
        }
    }
}

/// 行映射（明细由调用方另行装配）
fn map_order_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    let status_str: String = row.get(7)?;

    Ok(Order {
        order_id: row.get(0)?,
        order_number: row.get(1)?,
        store_id: row.get(2)?,
        slot_id: row.get(3)?,
        customer_name: row.get(4)?,
        customer_phone: row.get(5)?,
        customer_email: row.get(6)?,
        status: OrderStatus::parse(&status_str).unwrap_or(OrderStatus::Pending), // 默认值
        estimated_total: row.get(8)?,
        final_total: row.get(9)?,
        pickup_time: parse_dt(&row.get::<_, String>(10)?),
        request_details: row.get(11)?,
        special_notes: row.get(12)?,
        privacy_accepted: row.get::<_, i32>(13)? != 0,
        created_at: parse_dt(&row.get::<_, String>(14)?),
        updated_at: parse_dt(&row.get::<_, String>(15)?),
        items: Vec::new(),
    })
}

/// 明细行映射
fn map_item_row(row: &Row<'_>) -> rusqlite::Result<OrderItem> {
    Ok(OrderItem {
        item_id: row.get(0)?,
        order_id: row.get(1)?,
        product_id: row.get(2)?,
        quantity: row.get(3)?,
        unit: row.get(4)?,
        price: row.get(5)?,
    })
}
