// ==========================================
// 门店自提预订系统 - 自提时段领域模型
// ==========================================
// 不变量: 0 <= booked_count <= max_capacity
// 红线: booked_count 只由预订操作递增，本核心无任何递减路径
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// TimeSlot - 自提时段
// ==========================================
// 由外部排班任务批量生成（种子工具代行），预订时只做容量递增
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_id: String,            // 时段ID
    pub store_id: String,           // 所属门店
    pub start_time: NaiveDateTime,  // 开始时间（订单 pickup_time 的来源）
    pub end_time: NaiveDateTime,    // 结束时间
    pub max_capacity: i32,          // 容量上限
    pub booked_count: i32,          // 已预订数
    pub is_available: bool,         // 是否开放预订
}

impl TimeSlot {
    /// 剩余可预订容量
    pub fn remaining_capacity(&self) -> i32 {
        (self.max_capacity - self.booked_count).max(0)
    }

    /// 判断是否已满
    pub fn is_full(&self) -> bool {
        self.booked_count >= self.max_capacity
    }
}
