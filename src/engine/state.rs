// ==========================================
// 门店排班填充系统 - 周派生状态
// ==========================================
// 职责: 由 (员工, 历史计数, 预先存在排班) 一次性构建本次运行的
//       全部派生结构；两池之间只允许协调器调 reserve 变更
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::assignment::{Assignment, SlotInstance, Worker};
use crate::domain::types::{
    active_slot_ring, in_bar_window, RoleClass, BAR_LOCATIONS, GENERAL_LOCATIONS,
};
use crate::engine::scoring;
use std::collections::{HashMap, HashSet};

// ==========================================
// WeekState - 周派生状态
// ==========================================

/// 一次引擎调用的派生状态
///
/// 不变量（池求解期间只读）:
/// - assigned_workers 中的员工不进入任何可排池（人工录入优先）
/// - worker_at_slot 禁止 (员工, 槽位) 重复占用
/// - capacity_map 只记录可排员工
#[derive(Debug, Clone)]
pub struct WeekState {
    /// 活动槽位环
    pub slots: Vec<i32>,
    /// 已被预先存在排班占用的槽位岗位
    pub assigned_positions: HashSet<SlotInstance>,
    /// 本周已有预先存在排班的员工（整体排除出可排池）
    pub assigned_workers: HashSet<i32>,
    /// 禁止新排班的 (员工, 槽位) 组合
    pub worker_at_slot: HashSet<(i32, i32)>,
    /// 未填充的大厅槽位岗位，环序
    pub missing_general: Vec<SlotInstance>,
    /// 未填充的吧台槽位岗位，环序且已过接班窗口过滤
    pub missing_bar: Vec<SlotInstance>,
    /// 可排吧台员工，id 升序
    pub eligible_bar: Vec<i32>,
    /// 可排大厅员工，id 升序
    pub eligible_general: Vec<i32>,
    /// 可排员工 -> 本周剩余班次配额
    pub capacity_map: HashMap<i32, i64>,
    /// 可排员工 -> 逻辑斯蒂负荷权重
    pub weights: HashMap<i32, f64>,
    /// 全量员工 -> 历史班次计数
    pub counts: HashMap<i32, i64>,
}

impl WeekState {
    /// 构建周派生状态
    ///
    /// # 参数
    /// - workers: 全量员工（id 升序）
    /// - counts: 全量员工历史计数
    /// - pre_existing: 该周已存在的排班
    /// - config: 引擎参数
    pub fn build(
        workers: &[Worker],
        counts: &HashMap<i32, i64>,
        pre_existing: &[Assignment],
        config: &ScheduleConfig,
    ) -> Self {
        let slots = active_slot_ring();

        // 预先存在排班展开为三张查找表
        let mut assigned_positions = HashSet::new();
        let mut assigned_workers = HashSet::new();
        let mut worker_at_slot = HashSet::new();
        for assignment in pre_existing {
            assigned_positions.insert(assignment.position());
            assigned_workers.insert(assignment.worker_id);
            worker_at_slot.insert((assignment.worker_id, assignment.slot));
        }

        // 缺口清单: 槽位为外层，槽位内大厅在前、吧台在后
        let mut missing = Vec::new();
        for &slot in &slots {
            for location in GENERAL_LOCATIONS {
                let position = SlotInstance::new(slot, location);
                if !assigned_positions.contains(&position) {
                    missing.push(position);
                }
            }
            for location in BAR_LOCATIONS {
                let position = SlotInstance::new(slot, location);
                if !assigned_positions.contains(&position) {
                    missing.push(position);
                }
            }
        }

        // 按角色拆分缺口；吧台缺口额外受接班窗口约束
        let mut missing_general = Vec::new();
        let mut missing_bar = Vec::new();
        for position in missing {
            match position.location.role_class() {
                RoleClass::General => missing_general.push(position),
                RoleClass::Bar => {
                    if in_bar_window(position.slot) {
                        missing_bar.push(position);
                    }
                }
            }
        }

        // 可排员工与配额
        let mut capacity_map = HashMap::new();
        let mut eligible = Vec::new();
        for worker in workers {
            if !assigned_workers.contains(&worker.id) {
                capacity_map.insert(worker.id, config.weekly_cap);
                eligible.push(worker.id);
            }
        }

        // 按角色拆分可排池
        let role_of: HashMap<i32, RoleClass> =
            workers.iter().map(|w| (w.id, w.role)).collect();
        let mut eligible_bar = Vec::new();
        let mut eligible_general = Vec::new();
        for worker_id in eligible.iter().copied() {
            match role_of[&worker_id] {
                RoleClass::Bar => eligible_bar.push(worker_id),
                RoleClass::General => eligible_general.push(worker_id),
            }
        }

        // 负荷权重; max_count 取全量员工的历史最大值
        let max_count = counts.values().copied().max().unwrap_or(0);
        let weights = scoring::load_weights(&eligible, counts, max_count, config);

        Self {
            slots,
            assigned_positions,
            assigned_workers,
            worker_at_slot,
            missing_general,
            missing_bar,
            eligible_bar,
            eligible_general,
            capacity_map,
            weights,
            counts: counts.clone(),
        }
    }

    /// 在两池之间登记一条已生成的排班
    ///
    /// 扣减该员工的剩余配额并封锁 (员工, 槽位)，
    /// 防止第二池在同一槽位或超配额地重排该员工
    pub fn reserve(&mut self, assignment: &Assignment) {
        if let Some(capacity) = self.capacity_map.get_mut(&assignment.worker_id) {
            *capacity -= 1;
        }
        self.worker_at_slot
            .insert((assignment.worker_id, assignment.slot));
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Location;

    fn general_worker(id: i32) -> Worker {
        Worker::new(id, format!("G{id}"), RoleClass::General)
    }

    fn bar_worker(id: i32) -> Worker {
        Worker::new(id, format!("B{id}"), RoleClass::Bar)
    }

    fn zero_counts(workers: &[Worker]) -> HashMap<i32, i64> {
        workers.iter().map(|w| (w.id, 0)).collect()
    }

    #[test]
    fn test_empty_week_missing_counts() {
        // 空周: 6 槽 x 5 大厅岗 = 30 个大厅缺口；
        // 吧台 6 x 2 = 12，窗口过滤后剩 4 槽 x 2 = 8
        let workers = vec![general_worker(1), bar_worker(2)];
        let counts = zero_counts(&workers);
        let state = WeekState::build(&workers, &counts, &[], &ScheduleConfig::default());

        assert_eq!(state.missing_general.len(), 30);
        assert_eq!(state.missing_bar.len(), 8);
        assert!(state
            .missing_bar
            .iter()
            .all(|p| [46, 47, 0, 1].contains(&p.slot)));
    }

    #[test]
    fn test_missing_order_slot_major() {
        let workers = vec![general_worker(1)];
        let counts = zero_counts(&workers);
        let state = WeekState::build(&workers, &counts, &[], &ScheduleConfig::default());

        // 槽位外层按环序，槽位内按岗位声明序
        assert_eq!(
            state.missing_general[0],
            SlotInstance::new(44, Location::Front1)
        );
        assert_eq!(
            state.missing_general[4],
            SlotInstance::new(44, Location::Runner)
        );
        assert_eq!(
            state.missing_general[5],
            SlotInstance::new(45, Location::Front1)
        );
        // 环尾在最后
        assert_eq!(
            state.missing_general[29],
            SlotInstance::new(1, Location::Runner)
        );
    }

    #[test]
    fn test_pre_existing_excludes_position_and_worker() {
        let workers = vec![general_worker(7), general_worker(8)];
        let counts = zero_counts(&workers);
        let pre = vec![Assignment::new(44, Location::Front1, 7)];
        let state = WeekState::build(&workers, &counts, &pre, &ScheduleConfig::default());

        // 位置被占用，缺口减一
        assert_eq!(state.missing_general.len(), 29);
        assert!(!state
            .missing_general
            .contains(&SlotInstance::new(44, Location::Front1)));
        // 员工 7 整体出池，(7, 44) 被封锁
        assert!(state.assigned_workers.contains(&7));
        assert!(!state.capacity_map.contains_key(&7));
        assert_eq!(state.eligible_general, vec![8]);
        assert!(state.worker_at_slot.contains(&(7, 44)));
    }

    #[test]
    fn test_role_partition_and_capacity() {
        let workers = vec![general_worker(1), bar_worker(2), general_worker(3)];
        let counts = zero_counts(&workers);
        let state = WeekState::build(&workers, &counts, &[], &ScheduleConfig::default());

        assert_eq!(state.eligible_general, vec![1, 3]);
        assert_eq!(state.eligible_bar, vec![2]);
        assert_eq!(state.capacity_map[&1], 2);
        assert_eq!(state.capacity_map[&2], 2);
    }

    #[test]
    fn test_reserve_decrements_and_blocks() {
        let workers = vec![bar_worker(2)];
        let counts = zero_counts(&workers);
        let mut state = WeekState::build(&workers, &counts, &[], &ScheduleConfig::default());

        state.reserve(&Assignment::new(46, Location::Bar1, 2));
        assert_eq!(state.capacity_map[&2], 1);
        assert!(state.worker_at_slot.contains(&(2, 46)));
    }

    #[test]
    fn test_bar_position_taken_by_pre_existing() {
        // 预占 (46, Bar1) 后吧台缺口为 7
        let workers = vec![bar_worker(2), bar_worker(3)];
        let counts = zero_counts(&workers);
        let pre = vec![Assignment::new(46, Location::Bar1, 3)];
        let state = WeekState::build(&workers, &counts, &pre, &ScheduleConfig::default());

        assert_eq!(state.missing_bar.len(), 7);
        assert_eq!(state.eligible_bar, vec![2]);
    }
}
