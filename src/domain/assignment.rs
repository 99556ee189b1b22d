// ==========================================
// 门店排班填充系统 - 领域实体
// ==========================================
// 实体: Worker (员工) / SlotInstance (槽位岗位) / Assignment (排班记录)
// 员工由外部系统创建，本系统只读
// ==========================================

use crate::domain::types::{Location, RoleClass};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Worker - 员工
// ==========================================

/// 员工（只读视图）
///
/// 对应 users 表的一行；历史班次数单独聚合，不在此结构上
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// 稳定的整数主键 (users.id)
    pub id: i32,
    /// 展示名 (users.user_id)
    pub display_name: String,
    /// 角色类别，由 users.status 解析
    pub role: RoleClass,
}

impl Worker {
    pub fn new(id: i32, display_name: impl Into<String>, role: RoleClass) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
        }
    }
}

// ==========================================
// SlotInstance - 槽位岗位
// ==========================================

/// 一个可填充的位置: (槽位索引, 岗位)
///
/// 每周内每个槽位岗位至多由一名员工占用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotInstance {
    pub slot: i32,
    pub location: Location,
}

impl SlotInstance {
    pub fn new(slot: i32, location: Location) -> Self {
        Self { slot, location }
    }
}

impl fmt::Display for SlotInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot={} location={}", self.slot, self.location)
    }
}

// ==========================================
// Assignment - 排班记录
// ==========================================

/// 一条排班: (槽位索引, 岗位, 员工)
///
/// 预先存在的排班来自存储；生成的排班来自引擎。周标识在写入时附加
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub slot: i32,
    pub location: Location,
    pub worker_id: i32,
}

impl Assignment {
    pub fn new(slot: i32, location: Location, worker_id: i32) -> Self {
        Self {
            slot,
            location,
            worker_id,
        }
    }

    /// 该排班占用的槽位岗位
    pub fn position(&self) -> SlotInstance {
        SlotInstance::new(self.slot, self.location)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slot={} location={} worker={}",
            self.slot, self.location, self.worker_id
        )
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_position() {
        let a = Assignment::new(44, Location::Front1, 7);
        assert_eq!(a.position(), SlotInstance::new(44, Location::Front1));
    }

    #[test]
    fn test_worker_role() {
        let w = Worker::new(3, "Carol", RoleClass::Bar);
        assert_eq!(w.role, RoleClass::Bar);
        assert_eq!(w.display_name, "Carol");
    }
}
