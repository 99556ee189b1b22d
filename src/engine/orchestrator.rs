// ==========================================
// 门店排班填充系统 - 两池协调器
// ==========================================
// 顺序: 先吧台池、后大厅池。吧台可排员工相对吧台缺口更稀缺，
// 必须先行锁定配额，再把占用传递给大厅池
// ==========================================

use crate::config::{ScheduleConfig, ShortfallPolicy};
use crate::domain::assignment::{Assignment, Worker};
use crate::engine::planner::{plan_pool, PoolPlan};
use crate::engine::state::WeekState;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ==========================================
// PoolReport - 单池结果报告
// ==========================================

/// 单池求解的结果摘要，随运行日志输出
#[derive(Debug, Clone, Serialize)]
pub struct PoolReport {
    /// 请求填充的缺口数
    pub requested: usize,
    /// 实际生成的排班数
    pub filled: usize,
    /// 是否达成满流
    pub feasible: bool,
    /// 接受的解是否通过公平性闸门
    pub fair: bool,
    /// 接受的解所用的平滑系数
    pub smoothing_factor: f64,
    /// 接受的解的总费用
    pub cost: i64,
}

impl PoolReport {
    fn from_plan(plan: &PoolPlan) -> Self {
        Self {
            requested: plan.requested,
            filled: plan.filled(),
            feasible: plan.feasible,
            fair: plan.fair,
            smoothing_factor: plan.smoothing_factor,
            cost: plan.cost,
        }
    }
}

// ==========================================
// FillOutcome - 一次填充运行的产出
// ==========================================

/// 一次引擎调用的完整产出
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// 合并清单: 预先存在 ++ 吧台生成 ++ 大厅生成
    pub manifest: Vec<Assignment>,
    /// 吧台池生成的排班（已过缺口策略）
    pub generated_bar: Vec<Assignment>,
    /// 大厅池生成的排班（已过缺口策略）
    pub generated_general: Vec<Assignment>,
    /// 吧台池报告
    pub bar_report: PoolReport,
    /// 大厅池报告
    pub general_report: PoolReport,
}

impl FillOutcome {
    /// 两池合计生成数
    pub fn generated_count(&self) -> usize {
        self.generated_bar.len() + self.generated_general.len()
    }

    /// 是否存在未填充的缺口
    pub fn has_shortfall(&self) -> bool {
        !self.bar_report.feasible || !self.general_report.feasible
    }
}

// ==========================================
// ShiftOrchestrator - 两池协调器
// ==========================================

pub struct ShiftOrchestrator {
    config: ScheduleConfig,
}

impl ShiftOrchestrator {
    /// 创建协调器实例
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// 填充一周的缺口
    ///
    /// # 参数
    /// - workers: 全量员工（id 升序）
    /// - counts: 全量员工历史班次计数
    /// - pre_existing: 该周预先存在的排班（人工录入优先，原样保留）
    ///
    /// # 返回
    /// 合并清单与两池报告；缺口不是错误，体现在报告中
    pub fn fill_week(
        &self,
        workers: &[Worker],
        counts: &HashMap<i32, i64>,
        pre_existing: &[Assignment],
    ) -> FillOutcome {
        info!(
            workers = workers.len(),
            pre_existing = pre_existing.len(),
            "开始填充周排班"
        );

        let mut state = WeekState::build(workers, counts, pre_existing, &self.config);
        debug!(
            eligible_bar = state.eligible_bar.len(),
            eligible_general = state.eligible_general.len(),
            missing_bar = state.missing_bar.len(),
            missing_general = state.missing_general.len(),
            "派生状态构建完成"
        );

        // ==========================================
        // 步骤1: 吧台池
        // ==========================================
        let bar_plan = plan_pool(
            &state.slots,
            &state.eligible_bar,
            &state.missing_bar,
            &state.counts,
            &state.capacity_map,
            &state.worker_at_slot,
            &state.weights,
            &self.config,
        );
        let bar_report = PoolReport::from_plan(&bar_plan);
        let generated_bar = self.apply_shortfall_policy(bar_plan, "bar");

        // 吧台结果回写共享状态，大厅池不得重复占用
        for assignment in &generated_bar {
            state.reserve(assignment);
        }

        // ==========================================
        // 步骤2: 大厅池
        // ==========================================
        let general_plan = plan_pool(
            &state.slots,
            &state.eligible_general,
            &state.missing_general,
            &state.counts,
            &state.capacity_map,
            &state.worker_at_slot,
            &state.weights,
            &self.config,
        );
        let general_report = PoolReport::from_plan(&general_plan);
        let generated_general = self.apply_shortfall_policy(general_plan, "general");

        // ==========================================
        // 步骤3: 合并清单
        // ==========================================
        let mut manifest =
            Vec::with_capacity(pre_existing.len() + generated_bar.len() + generated_general.len());
        manifest.extend_from_slice(pre_existing);
        manifest.extend_from_slice(&generated_bar);
        manifest.extend_from_slice(&generated_general);

        info!(
            bar_filled = bar_report.filled,
            bar_requested = bar_report.requested,
            general_filled = general_report.filled,
            general_requested = general_report.requested,
            total = manifest.len(),
            "周排班填充完成"
        );

        FillOutcome {
            manifest,
            generated_bar,
            generated_general,
            bar_report,
            general_report,
        }
    }

    /// 按缺口策略处置单池结果
    ///
    /// 满流解直接放行（无公平解时记录降级）；
    /// 不可行时按配置保留或丢弃部分解，两种路径都记日志
    fn apply_shortfall_policy(&self, plan: PoolPlan, pool: &str) -> Vec<Assignment> {
        if plan.feasible {
            if !plan.fair {
                warn!(
                    pool,
                    smoothing_factor = plan.smoothing_factor,
                    "无平滑系数通过公平性闸门，采用最后一个可行解"
                );
            }
            return plan.matching;
        }

        let shortfall = plan.requested - plan.filled();
        match self.config.shortfall_policy {
            ShortfallPolicy::KeepPartial => {
                warn!(
                    pool,
                    requested = plan.requested,
                    filled = plan.filled(),
                    shortfall,
                    "无法填满全部缺口，保留部分解"
                );
                plan.matching
            }
            ShortfallPolicy::Discard => {
                warn!(
                    pool,
                    requested = plan.requested,
                    filled = plan.filled(),
                    shortfall,
                    "无法填满全部缺口，按策略丢弃部分解"
                );
                Vec::new()
            }
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Location, RoleClass};

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
    fn test_bar_first_reservation() {
        // 唯一的吧台员工在吧台池拿满 2 班后，
        // 其 (员工, 槽位) 占用与配额对大厅池可见
        let workers = vec![bar_worker(1), general_worker(2), general_worker(3)];
        let counts = zero_counts(&workers);
        let orchestrator = ShiftOrchestrator::new(ScheduleConfig::default());

        let outcome = orchestrator.fill_week(&workers, &counts, &[]);

        assert_eq!(outcome.generated_bar.len(), 2);
        assert!(outcome
            .generated_bar
            .iter()
            .all(|a| a.location.role_class() == RoleClass::Bar));
        // 吧台员工绝不出现在大厅生成清单中（角色分池）
        assert!(outcome
            .generated_general
            .iter()
            .all(|a| a.worker_id != 1));
        // 吧台缺口 8 > 2，报告部分可行
        assert!(!outcome.bar_report.feasible);
        assert_eq!(outcome.bar_report.filled, 2);
    }

    #[test]
    fn test_no_bar_workers_leaves_bar_empty() {
        let workers: Vec<Worker> = (1..=4).map(general_worker).collect();
        let counts = zero_counts(&workers);
        let orchestrator = ShiftOrchestrator::new(ScheduleConfig::default());

        let outcome = orchestrator.fill_week(&workers, &counts, &[]);

        assert!(outcome.generated_bar.is_empty());
        assert!(!outcome.bar_report.feasible);
        assert_eq!(outcome.bar_report.requested, 8);
        assert_eq!(outcome.bar_report.filled, 0);
    }

    #[test]
    fn test_discard_policy_drops_partial() {
        let mut config = ScheduleConfig::default();
        config.shortfall_policy = ShortfallPolicy::Discard;
        let workers = vec![bar_worker(1)];
        let counts = zero_counts(&workers);
        let orchestrator = ShiftOrchestrator::new(config);

        let outcome = orchestrator.fill_week(&workers, &counts, &[]);

        // 吧台 8 缺口只能填 2，Discard 策略下整池丢弃
        assert!(outcome.generated_bar.is_empty());
        assert!(!outcome.bar_report.feasible);
        assert_eq!(outcome.bar_report.filled, 2);
    }

    #[test]
    fn test_manifest_merge_order() {
        let workers = vec![general_worker(2)];
        let counts = zero_counts(&workers);
        let pre = vec![Assignment::new(44, Location::Front1, 9)];
        let orchestrator = ShiftOrchestrator::new(ScheduleConfig::default());

        let outcome = orchestrator.fill_week(&workers, &counts, &pre);

        // 预先存在的排班保持在合并清单头部
        assert_eq!(outcome.manifest[0], pre[0]);
        assert_eq!(
            outcome.manifest.len(),
            pre.len() + outcome.generated_count()
        );
    }
}
