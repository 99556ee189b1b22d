// ==========================================
// 门店排班填充系统 - 单池规划器
// ==========================================
// 流程: 建图 -> 最小费用最大流 -> 提取匹配 -> 公平性闸门
// 平滑系数从 0.0 到 1.0 步进 0.1 扫描；优先接受第一个公平解，
// 全程无公平解时退回最后一个可行解，全程不可行时按缺口上报部分解
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::assignment::{Assignment, SlotInstance};
use crate::engine::fairness;
use crate::engine::flow::FlowGraph;
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ==========================================
// NodeLayout - 分层图的顶点布局
// ==========================================

/// 分层残量图的顶点编号方案
///
/// 层序: source / 员工层 / (员工, 槽位) 层 / 缺口层 / sink。
/// (员工, 槽位) 层的存在使"每员工每槽位至多一班"在多岗位
/// 共享同一槽位时依然成立
#[derive(Debug, Clone, Copy)]
pub struct NodeLayout {
    pub source: usize,
    pub first_worker: usize,
    pub worker_slot_start: usize,
    pub missing_start: usize,
    pub sink: usize,
    pub slot_count: usize,
}

impl NodeLayout {
    pub fn new(eligible_count: usize, slot_count: usize, missing_count: usize) -> Self {
        let first_worker = 1;
        let worker_slot_start = first_worker + eligible_count;
        let missing_start = worker_slot_start + eligible_count * slot_count;
        let sink = missing_start + missing_count;
        Self {
            source: 0,
            first_worker,
            worker_slot_start,
            missing_start,
            sink,
            slot_count,
        }
    }

    pub fn node_count(&self) -> usize {
        self.sink + 1
    }

    pub fn worker_node(&self, worker_index: usize) -> usize {
        self.first_worker + worker_index
    }

    pub fn worker_slot_node(&self, worker_index: usize, slot_index: usize) -> usize {
        self.worker_slot_start + worker_index * self.slot_count + slot_index
    }

    pub fn missing_node(&self, missing_index: usize) -> usize {
        self.missing_start + missing_index
    }
}

// ==========================================
// 建图
// ==========================================

/// 由池实例构建分层残量图
///
/// 边集:
/// - source -> 员工: 容量 = 剩余配额, 费用 0
/// - 员工 -> (员工, 槽位): 容量 1, 费用 0（每槽位唯一性的落点）
/// - (员工, 槽位) -> 缺口: 容量 1, 费用 = round(平滑系数 * 权重)，
///   仅当缺口槽位吻合且 (员工, 槽位) 未被封锁时生成
/// - 缺口 -> sink: 容量 1, 费用 0
#[allow(clippy::too_many_arguments)]
pub fn build_flow_network(
    slots: &[i32],
    eligible: &[i32],
    missing: &[SlotInstance],
    capacity_map: &HashMap<i32, i64>,
    worker_at_slot: &HashSet<(i32, i32)>,
    weights: &HashMap<i32, f64>,
    smoothing_factor: f64,
) -> (FlowGraph, NodeLayout) {
    let layout = NodeLayout::new(eligible.len(), slots.len(), missing.len());
    let mut graph = FlowGraph::new(layout.node_count());

    for (i, &worker_id) in eligible.iter().enumerate() {
        let capacity = capacity_map.get(&worker_id).copied().unwrap_or(0);
        graph.add_edge(layout.source, layout.worker_node(i), capacity, 0);
    }

    for i in 0..eligible.len() {
        for j in 0..slots.len() {
            graph.add_edge(layout.worker_node(i), layout.worker_slot_node(i, j), 1, 0);
        }
    }

    for (i, &worker_id) in eligible.iter().enumerate() {
        let weight = weights.get(&worker_id).copied().unwrap_or(0.0);
        let cost = (smoothing_factor * weight).round() as i64;

        for (j, &slot) in slots.iter().enumerate() {
            if worker_at_slot.contains(&(worker_id, slot)) {
                continue;
            }
            for (k, position) in missing.iter().enumerate() {
                if position.slot != slot {
                    continue;
                }
                graph.add_edge(
                    layout.worker_slot_node(i, j),
                    layout.missing_node(k),
                    1,
                    cost,
                );
            }
        }
    }

    for k in 0..missing.len() {
        graph.add_edge(layout.missing_node(k), layout.sink, 1, 0);
    }

    (graph, layout)
}

// ==========================================
// 匹配提取
// ==========================================

/// 从收敛后的残量图读出匹配
///
/// (员工, 槽位) 层每条指向缺口层且剩余容量为 0 的正向边
/// 代表一单位已饱和的流。扫描顺序固定: 员工外层、槽位内层，
/// 保证同一输入下输出顺序稳定
pub fn extract_matching(
    graph: &FlowGraph,
    layout: &NodeLayout,
    eligible: &[i32],
    missing: &[SlotInstance],
) -> Vec<Assignment> {
    let mut matching = Vec::new();

    for (i, &worker_id) in eligible.iter().enumerate() {
        for j in 0..layout.slot_count {
            let node = layout.worker_slot_node(i, j);
            for edge in graph.edges(node) {
                if edge.to >= layout.missing_start
                    && edge.to < layout.missing_start + missing.len()
                    && edge.capacity == 0
                {
                    let position = missing[edge.to - layout.missing_start];
                    matching.push(Assignment::new(position.slot, position.location, worker_id));
                }
            }
        }
    }

    matching
}

// ==========================================
// PoolPlan - 单池规划结果
// ==========================================

/// 单池规划结果
///
/// 缺口（requested > filled）是数据状况而非错误，
/// 由协调器按策略处置
#[derive(Debug, Clone)]
pub struct PoolPlan {
    /// 生成的匹配（不可行时为部分解）
    pub matching: Vec<Assignment>,
    /// 请求填充的缺口数
    pub requested: usize,
    /// 是否达成满流
    pub feasible: bool,
    /// 被接受的解是否通过公平性闸门
    pub fair: bool,
    /// 被接受的解所用的平滑系数
    pub smoothing_factor: f64,
    /// 被接受的解的总费用
    pub cost: i64,
}

impl PoolPlan {
    /// 实际填充数
    pub fn filled(&self) -> usize {
        self.matching.len()
    }
}

// ==========================================
// 单次求解（固定平滑系数）
// ==========================================

/// 以固定平滑系数建图并求解一次
///
/// # 返回
/// (流量, 费用, 匹配)
#[allow(clippy::too_many_arguments)]
pub(crate) fn solve_once(
    slots: &[i32],
    eligible: &[i32],
    missing: &[SlotInstance],
    capacity_map: &HashMap<i32, i64>,
    worker_at_slot: &HashSet<(i32, i32)>,
    weights: &HashMap<i32, f64>,
    smoothing_factor: f64,
) -> (i64, i64, Vec<Assignment>) {
    let (mut graph, layout) = build_flow_network(
        slots,
        eligible,
        missing,
        capacity_map,
        worker_at_slot,
        weights,
        smoothing_factor,
    );
    let (flow, cost) = graph.min_cost_max_flow(layout.source, layout.sink);
    let matching = extract_matching(&graph, &layout, eligible, missing);
    (flow, cost, matching)
}

// ==========================================
// 规划主循环
// ==========================================

/// 求解单个池
///
/// 平滑系数扫描: 每个取值从零重建图求满流；
/// 满流解先过公平性闸门，第一个公平解立即接受；
/// 扫完无公平解则取最后一个可行解；
/// 全程无满流则返回末轮的部分解并标记不可行
#[allow(clippy::too_many_arguments)]
pub fn plan_pool(
    slots: &[i32],
    eligible: &[i32],
    missing: &[SlotInstance],
    counts: &HashMap<i32, i64>,
    capacity_map: &HashMap<i32, i64>,
    worker_at_slot: &HashSet<(i32, i32)>,
    weights: &HashMap<i32, f64>,
    config: &ScheduleConfig,
) -> PoolPlan {
    let requested = missing.len();
    if requested == 0 {
        return PoolPlan {
            matching: Vec::new(),
            requested: 0,
            feasible: true,
            fair: true,
            smoothing_factor: 0.0,
            cost: 0,
        };
    }

    let mut last_feasible: Option<(Vec<Assignment>, f64, i64)> = None;
    let mut partial: Option<(Vec<Assignment>, f64, i64)> = None;

    let mut factor = 0.0;
    while factor <= 1.0 + config.epsilon {
        let (flow, cost, matching) = solve_once(
            slots,
            eligible,
            missing,
            capacity_map,
            worker_at_slot,
            weights,
            factor,
        );
        debug!(
            smoothing_factor = factor,
            flow,
            cost,
            requested,
            "平滑系数迭代"
        );

        if (flow as usize) < requested {
            partial = Some((matching, factor, cost));
            factor += config.smoothing_step;
            continue;
        }

        if fairness::is_fair(&matching, counts, config) {
            return PoolPlan {
                matching,
                requested,
                feasible: true,
                fair: true,
                smoothing_factor: factor,
                cost,
            };
        }

        last_feasible = Some((matching, factor, cost));
        factor += config.smoothing_step;
    }

    if let Some((matching, smoothing_factor, cost)) = last_feasible {
        return PoolPlan {
            matching,
            requested,
            feasible: true,
            fair: false,
            smoothing_factor,
            cost,
        };
    }

    let (matching, smoothing_factor, cost) = partial.unwrap_or((Vec::new(), 0.0, 0));
    PoolPlan {
        matching,
        requested,
        feasible: false,
        fair: false,
        smoothing_factor,
        cost,
    }
}
