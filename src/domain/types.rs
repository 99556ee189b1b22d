// ==========================================
// 门店排班填充系统 - 领域类型定义
// ==========================================
// 排班窗口: 48 个半小时槽位中跨午夜的一段 (22:00 - 01:00)
// 岗位体系: 大厅 5 岗 + 吧台 2 岗
// ==========================================

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 槽位常量
// ==========================================

/// 排班窗口起始槽位 (22:00)
pub const FIRST_SLOT: i32 = 44;

/// 排班窗口结束槽位 (01:00, 不含)
pub const LAST_SLOT: i32 = 2;

/// 每天的半小时槽位总数
pub const TOTAL_SLOTS: i32 = 48;

/// 吧台开始接班的偏移量: 环上第一个小时不排吧台
pub const BAR_OPEN_OFFSET: i32 = 2;

/// 活动槽位环: [44, 45, 46, 47, 0, 1]（跨午夜）
pub fn active_slot_ring() -> Vec<i32> {
    (FIRST_SLOT..TOTAL_SLOTS).chain(0..LAST_SLOT).collect()
}

/// 判断槽位是否处于吧台接班窗口
///
/// 规则: slot >= FIRST_SLOT + 2 或 0 <= slot < LAST_SLOT，
/// 即环上第一个小时（44、45）不安排吧台岗位
pub fn in_bar_window(slot: i32) -> bool {
    slot >= FIRST_SLOT + BAR_OPEN_OFFSET || (slot >= 0 && slot < LAST_SLOT)
}

// ==========================================
// 角色类别 (Role Class)
// ==========================================
// 来源: users.status 字段；仅 "BAR" 识别为吧台，其余一律大厅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleClass {
    Bar,     // 吧台
    General, // 大厅
}

impl RoleClass {
    /// 从 users.status 文本解析角色类别
    ///
    /// 未记录/未知状态一律视为大厅
    pub fn from_status(status: &str) -> Self {
        if status == "BAR" {
            RoleClass::Bar
        } else {
            RoleClass::General
        }
    }
}

impl fmt::Display for RoleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleClass::Bar => write!(f, "BAR"),
            RoleClass::General => write!(f, "GENERAL"),
        }
    }
}

// ==========================================
// 岗位 (Location)
// ==========================================
// 序列化格式与 shifts.location 列的存储文本一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Front1,
    Front2,
    Side,
    Back,
    Runner,
    Bar1,
    Bar2,
}

/// 大厅岗位，按槽位内的生成顺序排列
pub const GENERAL_LOCATIONS: [Location; 5] = [
    Location::Front1,
    Location::Front2,
    Location::Side,
    Location::Back,
    Location::Runner,
];

/// 吧台岗位
pub const BAR_LOCATIONS: [Location; 2] = [Location::Bar1, Location::Bar2];

impl Location {
    /// 岗位所属的角色类别
    pub fn role_class(&self) -> RoleClass {
        match self {
            Location::Bar1 | Location::Bar2 => RoleClass::Bar,
            _ => RoleClass::General,
        }
    }

    /// 岗位在数据库中的存储文本
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Front1 => "Front1",
            Location::Front2 => "Front2",
            Location::Side => "Side",
            Location::Back => "Back",
            Location::Runner => "Runner",
            Location::Bar1 => "Bar1",
            Location::Bar2 => "Bar2",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Front1" => Ok(Location::Front1),
            "Front2" => Ok(Location::Front2),
            "Side" => Ok(Location::Side),
            "Back" => Ok(Location::Back),
            "Runner" => Ok(Location::Runner),
            "Bar1" => Ok(Location::Bar1),
            "Bar2" => Ok(Location::Bar2),
            other => Err(format!("未知岗位: {other}")),
        }
    }
}

// ==========================================
// 时间辅助函数
// ==========================================

/// 将半小时槽位索引格式化为 12 小时制时间标签
///
/// 例: 44 -> "10:00 PM", 1 -> "12:30 AM"
pub fn slot_to_time(slot: i32) -> String {
    let hr = (slot / 2) % 12;
    let hr = if hr == 0 { 12 } else { hr };
    let minute = if slot % 2 == 0 { "00" } else { "30" };
    let ampm = if slot < 24 { "AM" } else { "PM" };
    format!("{hr}:{minute} {ampm}")
}

/// 给定日期所在周的周一
///
/// 外层调度器以周一的 ISO 日期作为周标识调用本系统
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
