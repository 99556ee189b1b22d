// ==========================================
// 门店排班填充系统 - 公平性评估
// ==========================================
// 指标: 投影总班次数上的 Gini 系数，阈值随员工规模调整
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::assignment::Assignment;
use std::collections::HashMap;

/// 规模调整后的 Gini 阈值: min(1.0, base + adjust / N)
///
/// 小团队中一次额外排班对分布的扰动不成比例，
/// adjust / N 项为其放宽可接受区间
pub fn fairness_threshold(worker_count: usize, config: &ScheduleConfig) -> f64 {
    (config.gini_base + config.gini_size_adjust / worker_count as f64).min(1.0)
}

/// 计数分布的 Gini 系数: Σij |ci - cj| / (2 N² mean)
pub fn gini_coefficient(counts: &HashMap<i32, i64>) -> f64 {
    let n = counts.len();
    if n == 0 {
        return 0.0;
    }

    let total: i64 = counts.values().sum();
    let mean = total as f64 / n as f64;
    if mean <= 0.0 {
        return 0.0;
    }

    let mut difference = 0.0;
    for &ci in counts.values() {
        for &cj in counts.values() {
            difference += (ci - cj).abs() as f64;
        }
    }

    difference / (2.0 * (n as f64) * (n as f64) * mean)
}

/// 判断一份生成清单是否满足公平性
///
/// 投影计数 = 全量员工历史计数 + 本次生成的增量；
/// 员工数为 0 或投影均值低于容差时直接视为公平
pub fn is_fair(
    generated: &[Assignment],
    counts: &HashMap<i32, i64>,
    config: &ScheduleConfig,
) -> bool {
    let mut projected = counts.clone();
    for assignment in generated {
        *projected.entry(assignment.worker_id).or_insert(0) += 1;
    }

    let n = projected.len();
    if n == 0 {
        return true;
    }

    let total: i64 = projected.values().sum();
    let mean = total as f64 / n as f64;
    if mean < config.epsilon {
        return true;
    }

    gini_coefficient(&projected) <= fairness_threshold(n, config)
}
