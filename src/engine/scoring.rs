// ==========================================
// 门店排班填充系统 - 负荷权重计算
// ==========================================
// 逻辑斯蒂曲线: 历史班次少 -> 权重低 (便宜)，历史班次多 -> 权重高 (昂贵)
// ==========================================

use crate::config::ScheduleConfig;
use std::collections::HashMap;

/// 单个员工的逻辑斯蒂负荷权重
///
/// x = count / max_count（max_count 取 1 兜底，全零历史不除零），
/// raw = 1 / (1 + exp(steepness * (x - midpoint)))，
/// 压到 [epsilon, 1] 后取负对数
pub fn logistic_weight(count: i64, max_count: i64, config: &ScheduleConfig) -> f64 {
    let denominator = max_count.max(1) as f64;
    let x = count as f64 / denominator;
    let raw = 1.0 / (1.0 + (config.logistic_steepness * (x - config.logistic_midpoint)).exp());
    let clamped = raw.clamp(config.epsilon, 1.0);
    -clamped.ln()
}

/// 一批员工的负荷权重表
///
/// max_count 取全量员工（含不可排者）的历史最大值，
/// 使曲线在多周之间保持稳定
pub fn load_weights(
    eligible: &[i32],
    counts: &HashMap<i32, i64>,
    max_count: i64,
    config: &ScheduleConfig,
) -> HashMap<i32, f64> {
    eligible
        .iter()
        .map(|&worker_id| {
            let count = counts.get(&worker_id).copied().unwrap_or(0);
            (worker_id, logistic_weight(count, max_count, config))
        })
        .collect()
}
