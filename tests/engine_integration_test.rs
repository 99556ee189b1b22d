// ==========================================
// 排班填充引擎集成测试
// ==========================================
// 测试目标: 两池协调器的端到端行为
// 覆盖范围: 可行性、配额饱和、公平性偏好、预占尊重、吧台先行
// ==========================================


use std::collections::{HashMap, HashSet};
use test_helpers::{assert_manifest_invariants, bar_worker, general_worker, zero_counts};
use venue_shift_aps::domain::types::{active_slot_ring, GENERAL_LOCATIONS};
use venue_shift_aps::{
    Assignment, Location, ScheduleConfig, ShiftOrchestrator, ShortfallPolicy, SlotInstance,
    Worker,
};

// ==========================================
// 测试辅助函数
// ==========================================

/// 用外部录入的虚拟员工（id 从 1000 起）占满除 except 外的全部大厅岗位
fn occupy_general_except(except: &[SlotInstance]) -> Vec<Assignment> {
    let keep: HashSet<&SlotInstance> = except.iter().collect();
    let mut pre = Vec::new();
    let mut dummy_id = 1000;
    for slot in active_slot_ring() {
        for location in GENERAL_LOCATIONS {
            let position = SlotInstance::new(slot, location);
            if keep.contains(&position) {
                continue;
            }
            pre.push(Assignment::new(slot, location, dummy_id));
            dummy_id += 1;
        }
    }
    pre
}

fn fill(
    workers: &[Worker],
    counts: &HashMap<i32, i64>,
    pre_existing: &[Assignment],
) -> venue_shift_aps::FillOutcome {
    ShiftOrchestrator::new(ScheduleConfig::default()).fill_week(workers, counts, pre_existing)
}

// ==========================================
// 场景: 平凡可行
// ==========================================

#[test]
fn test_trivial_feasibility_full_general_fill() {
    // 15 名大厅员工 x 配额 2 恰好覆盖 30 个大厅缺口；
    // 无吧台员工时吧台缺口 (8) 原样空置
    let workers: Vec<Worker> = (1..=15).map(general_worker).collect();
    let counts = zero_counts(&workers);

    let outcome = fill(&workers, &counts, &[]);

    assert!(outcome.general_report.feasible);
    assert!(outcome.general_report.fair);
    assert_eq!(outcome.general_report.requested, 30);
    assert_eq!(outcome.generated_general.len(), 30);
    assert!(outcome.generated_bar.is_empty());
    assert_eq!(outcome.bar_report.requested, 8);
    assert_eq!(outcome.bar_report.filled, 0);

    // 满流时每条 source 边饱和: 每名员工恰好 2 班
    let mut per_worker: HashMap<i32, usize> = HashMap::new();
    for a in &outcome.generated_general {
        *per_worker.entry(a.worker_id).or_insert(0) += 1;
    }
    assert!(per_worker.values().all(|&n| n == 2));
    assert_eq!(per_worker.len(), 15);

    assert_manifest_invariants(&workers, &[], &outcome.generated_general, 2);
}

#[test]
fn test_undersized_workforce_keeps_partial_fill() {
    // 8 名大厅员工至多提供 16 班，30 个缺口无法填满；
    // 默认策略保留部分解并上报缺口
    let workers: Vec<Worker> = (1..=8).map(general_worker).collect();
    let counts = zero_counts(&workers);

    let outcome = fill(&workers, &counts, &[]);

    assert!(!outcome.general_report.feasible);
    assert_eq!(outcome.general_report.requested, 30);
    assert_eq!(outcome.generated_general.len(), 16);
    assert!(outcome.has_shortfall());
    assert_manifest_invariants(&workers, &[], &outcome.generated_general, 2);
}

// ==========================================
// 场景: 配额饱和
// ==========================================

#[test]
fn test_cap_saturation_partial_and_discard() {
    // 槽位 {44,45} 上留 8 个大厅缺口，3 名员工上限 3x2=6 < 8
    let open: Vec<SlotInstance> = [44, 45]
        .iter()
        .flat_map(|&slot| {
            [Location::Front1, Location::Front2, Location::Side, Location::Back]
                .into_iter()
                .map(move |location| SlotInstance::new(slot, location))
        })
        .collect();
    let pre = occupy_general_except(&open);
    let workers: Vec<Worker> = (1..=3).map(general_worker).collect();
    let counts = zero_counts(&workers);

    let outcome = fill(&workers, &counts, &pre);
    assert!(!outcome.general_report.feasible);
    assert_eq!(outcome.general_report.requested, 8);
    assert_eq!(outcome.generated_general.len(), 6);
    assert_manifest_invariants(&workers, &pre, &outcome.generated_general, 2);

    // Discard 策略下整池丢弃，合并清单只剩预先存在排班
    let mut config = ScheduleConfig::default();
    config.shortfall_policy = ShortfallPolicy::Discard;
    let outcome = ShiftOrchestrator::new(config).fill_week(&workers, &counts, &pre);
    assert!(outcome.generated_general.is_empty());
    assert_eq!(outcome.general_report.filled, 6);
    assert_eq!(outcome.manifest.len(), pre.len());
}

// ==========================================
// 场景: 公平性偏好
// ==========================================

#[test]
fn test_fairness_preference_low_history_wins() {
    // 员工 1 历史 100 班、员工 2 零历史，两个不同槽位的缺口
    // 应全部给到员工 2
    let open = vec![
        SlotInstance::new(44, Location::Front1),
        SlotInstance::new(45, Location::Front1),
    ];
    let pre = occupy_general_except(&open);
    let workers = vec![general_worker(1), general_worker(2)];
    let counts = HashMap::from([(1, 100i64), (2, 0)]);

    let outcome = fill(&workers, &counts, &pre);

    assert!(outcome.general_report.feasible);
    assert_eq!(outcome.generated_general.len(), 2);
    assert!(outcome.generated_general.iter().all(|a| a.worker_id == 2));
    // 历史差距过大，任何分派都到不了 Gini 阈值内，闸门降级为最后可行解
    assert!(!outcome.general_report.fair);
    assert_manifest_invariants(&workers, &pre, &outcome.generated_general, 2);
}

// ==========================================
// 场景: 预占尊重
// ==========================================

#[test]
fn test_pre_existing_assignment_respected() {
    // 员工 7 在 (44, Front1) 已有人工排班: 该员工整体出池，
    // 该位置不得出现在生成清单
    let workers: Vec<Worker> = (1..=8).map(general_worker).collect();
    let counts = zero_counts(&workers);
    let pre = vec![Assignment::new(44, Location::Front1, 7)];

    let outcome = fill(&workers, &counts, &pre);

    assert!(outcome
        .generated_general
        .iter()
        .all(|a| a.worker_id != 7));
    assert!(outcome
        .generated_general
        .iter()
        .all(|a| a.position() != SlotInstance::new(44, Location::Front1)));
    // 合并清单仍以人工排班开头
    assert_eq!(outcome.manifest[0], pre[0]);
    assert_manifest_invariants(&workers, &pre, &outcome.generated_general, 2);
}

// ==========================================
// 场景: 吧台先行锁定
// ==========================================

#[test]
fn test_bar_first_reservation_and_partial_feasibility() {
    // 1 名吧台员工、4 个吧台缺口 (Bar1 @ {46,47,0,1})、20 个大厅缺口。
    // 吧台员工拿满 2 班，余下 2 个吧台缺口上报缺口；
    // 大厅池不得引用吧台员工
    let bar_open: Vec<SlotInstance> = [46, 47, 0, 1]
        .iter()
        .map(|&slot| SlotInstance::new(slot, Location::Bar1))
        .collect();
    // 其余吧台窗口内岗位由外部录入占用
    let mut pre: Vec<Assignment> = [46, 47, 0, 1]
        .iter()
        .enumerate()
        .map(|(i, &slot)| Assignment::new(slot, Location::Bar2, 2000 + i as i32))
        .collect();
    // 占用 10 个大厅岗位，留 20 个大厅缺口
    let general_open: Vec<SlotInstance> = active_slot_ring()
        .into_iter()
        .flat_map(|slot| {
            [Location::Front1, Location::Front2, Location::Side, Location::Back]
                .into_iter()
                .map(move |location| SlotInstance::new(slot, location))
        })
        .take(20)
        .collect();
    pre.extend(occupy_general_except(&general_open));

    let mut workers = vec![bar_worker(1)];
    workers.extend((2..=11).map(general_worker));
    let counts = zero_counts(&workers);

    let outcome = fill(&workers, &counts, &pre);

    // 吧台: 配额 2 < 缺口 4，部分可行
    assert_eq!(outcome.generated_bar.len(), 2);
    assert!(!outcome.bar_report.feasible);
    assert_eq!(outcome.bar_report.requested, 4);
    assert!(outcome
        .generated_bar
        .iter()
        .all(|a| a.worker_id == 1 && a.location == Location::Bar1));
    // 大厅: 10 名员工 x 2 恰好覆盖 20 个缺口，且不引用吧台员工
    assert!(outcome.general_report.feasible);
    assert_eq!(outcome.generated_general.len(), 20);
    assert!(outcome.generated_general.iter().all(|a| a.worker_id != 1));

    let generated: Vec<Assignment> = outcome
        .generated_bar
        .iter()
        .chain(outcome.generated_general.iter())
        .copied()
        .collect();
    assert_manifest_invariants(&workers, &pre, &generated, 2);
}

// ==========================================
// 场景: 幂等与确定性
// ==========================================

#[test]
fn test_same_input_same_manifest() {
    // 同一输入两次运行产出完全一致的清单
    let mut workers = vec![bar_worker(1), bar_worker(2)];
    workers.extend((3..=9).map(general_worker));
    let counts: HashMap<i32, i64> = workers
        .iter()
        .map(|w| (w.id, (w.id as i64 * 7) % 13))
        .collect();
    let pre = vec![
        Assignment::new(44, Location::Side, 5),
        Assignment::new(46, Location::Bar2, 2),
    ];

    let first = fill(&workers, &counts, &pre);
    let second = fill(&workers, &counts, &pre);

    assert_eq!(first.manifest, second.manifest);
    assert_eq!(first.generated_bar, second.generated_bar);
    assert_eq!(first.generated_general, second.generated_general);
}
