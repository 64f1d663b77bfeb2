// ==========================================
// 门店自提预订系统 - 自提时段数据仓储
// ==========================================
// 不变量: 0 <= booked_count <= max_capacity
// 并发控制: 预订必须在事务内重读容量计数后再递增
// ==========================================

use crate::domain::slot::TimeSlot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::format_dt;
use crate::repository::parse_dt;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::sync::{Arc, Mutex};

// ==========================================
// TimeSlotRepository - 自提时段仓储
// ==========================================

/// 自提时段仓储
/// 职责: 时段查询与容量预订；批量写入仅供排班种子工具使用
pub struct TimeSlotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimeSlotRepository {
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

    /// 插入单个时段
    pub fn insert(&self, slot: &TimeSlot) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_slot(&conn, slot)
    }

    /// 批量插入时段（单事务，外部排班任务/种子工具使用）
    pub fn insert_batch(&self, slots: &[TimeSlot]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        for slot in slots {
            insert_slot(&tx, slot)?;
        }

        tx.commit()?;
        Ok(slots.len())
    }

    /// 按ID查询时段
    pub fn find_by_id(&self, slot_id: &str) -> RepositoryResult<Option<TimeSlot>> {
        let conn = self.get_conn()?;
        find_slot_by_id(&conn, slot_id)
    }

    /// 查询门店指定日期内可预订的时段
    ///
    /// 过滤条件:
    /// - is_available = 1
    /// - start_time 落在 date 当天
    /// - start_time > now（当天已过时段不再展示）
    ///
    /// 返回按 start_time 升序；每次调用重新计算，不做缓存。
    /// 已满时段仍会返回（调用方据 booked_count/max_capacity 展示余量）。
    pub fn find_available_by_date(
        &self,
        store_id: &str,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<TimeSlot>> {
        let conn = self.get_conn()?;

        let day_start = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            RepositoryError::ValidationError(format!("无效日期: {}", date))
        })?;
        let day_end = day_start + chrono::Duration::days(1);

        let mut stmt = conn.prepare(
            r#"SELECT slot_id, store_id, start_time, end_time,
                      max_capacity, booked_count, is_available
               FROM time_slot
               WHERE store_id = ?1
                 AND is_available = 1
                 AND start_time >= ?2
                 AND start_time < ?3
                 AND start_time > ?4
               ORDER BY start_time ASC, slot_id ASC"#,
        )?;

        let slots = stmt
            .query_map(
                params![
                    store_id,
                    format_dt(day_start),
                    format_dt(day_end),
                    format_dt(now)
                ],
                map_slot_row,
            )?
            .collect::<rusqlite::Result<Vec<TimeSlot>>>()?;

        Ok(slots)
    }

    /// 查询门店最早的开放时段（回退解析使用）
    ///
    /// 过滤条件: is_available = 1 且 start_time >= now；
    /// 排序: start_time 升序，slot_id 升序（确定性的同刻平局裁决）。
    /// 容量不在此过滤——满员与否由预订事务内的重读裁决。
    pub fn find_first_available(
        &self,
        store_id: &str,
        now: NaiveDateTime,
    ) -> RepositoryResult<Option<TimeSlot>> {
        let conn = self.get_conn()?;

        let slot = conn
            .query_row(
                r#"SELECT slot_id, store_id, start_time, end_time,
                          max_capacity, booked_count, is_available
                   FROM time_slot
                   WHERE store_id = ?1
                     AND is_available = 1
                     AND start_time >= ?2
                   ORDER BY start_time ASC, slot_id ASC
                   LIMIT 1"#,
                params![store_id, format_dt(now)],
                map_slot_row,
            )
            .optional()?;

        Ok(slot)
    }

    /// 预订时段（独立事务）
    ///
    /// # 返回
    /// - Ok(TimeSlot): 递增后的时段
    /// - Err(RepositoryError::NotFound): 时段不存在
    /// - Err(RepositoryError::SlotFull): 已满或未开放
    pub fn reserve(&self, slot_id: &str) -> RepositoryResult<TimeSlot> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let slot = reserve_slot_in_tx(&tx, slot_id)?;

        tx.commit()?;
        Ok(slot)
    }
}

/// 事务内预订：重读 -> 校验 -> 递增
///
/// 列表查询是无锁读，到预订时时段可能已被并发请求占满；
/// 事务内的这次重读再检查是防止超卖的唯一屏障，不可省略。
/// 供独立预订与"预订+建单"复合事务共用。
pub(crate) fn reserve_slot_in_tx(conn: &Connection, slot_id: &str) -> RepositoryResult<TimeSlot> {
    let slot = find_slot_by_id(conn, slot_id)?;

    let mut slot = slot.ok_or_else(|| RepositoryError::NotFound {
        entity: "TimeSlot".to_string(),
        id: slot_id.to_string(),
    })?;

    if !slot.is_available || slot.is_full() {
        return Err(RepositoryError::SlotFull {
            slot_id: slot_id.to_string(),
        });
    }

    conn.execute(
        "UPDATE time_slot SET booked_count = booked_count + 1 WHERE slot_id = ?1",
        params![slot_id],
    )?;

    slot.booked_count += 1;
    Ok(slot)
}

/// 按ID查询（连接级，事务内外共用）
fn find_slot_by_id(conn: &Connection, slot_id: &str) -> RepositoryResult<Option<TimeSlot>> {
    let slot = conn
        .query_row(
            r#"SELECT slot_id, store_id, start_time, end_time,
                      max_capacity, booked_count, is_available
               FROM time_slot
               WHERE slot_id = ?1"#,
            params![slot_id],
            map_slot_row,
        )
        .optional()?;

    Ok(slot)
}

/// 插入（连接级，事务内外共用）
fn insert_slot(conn: &Connection, slot: &TimeSlot) -> RepositoryResult<()> {
    conn.execute(
        r#"INSERT INTO time_slot (
            slot_id, store_id, start_time, end_time,
            max_capacity, booked_count, is_available
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
        params![
            &slot.slot_id,
            &slot.store_id,
            format_dt(slot.start_time),
            format_dt(slot.end_time),
            &slot.max_capacity,
            &slot.booked_count,
            slot.is_available as i32,
        ],
    )?;

    Ok(())
}

/// 行映射
fn map_slot_row(row: &Row<'_>) -> rusqlite::Result<TimeSlot> {
    Ok(TimeSlot {
        slot_id: row.get(0)?,
        store_id: row.get(1)?,
        start_time: parse_dt(&row.get::<_, String>(2)?),
        end_time: parse_dt(&row.get::<_, String>(3)?),
        max_capacity: row.get(4)?,
        booked_count: row.get(5)?,
        is_available: row.get::<_, i32>(6)? != 0,
    })
}
