// ==========================================
// 门店排班填充系统 - 配置层
// ==========================================
// 职责: 环境配置 (DATABASE_URL 规整) 与引擎调参
// ==========================================

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// 数据库连接串环境变量名
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// SQLAlchemy 风格的 scheme 前缀，需要规整为标准 postgresql://
const PSYCOPG2_SCHEME: &str = "postgresql+psycopg2://";

// ==========================================
// EnvConfig - 环境配置
// ==========================================

/// 进程级环境配置
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// 规整后的 Postgres 连接串
    pub database_url: String,
}

impl EnvConfig {
    /// 从环境变量加载配置
    ///
    /// # 返回
    /// - Ok(EnvConfig): 加载成功
    /// - Err(AppError::Config): DATABASE_URL 缺失
    pub fn from_env() -> Result<Self, AppError> {
        let raw = std::env::var(DATABASE_URL_ENV)
            .map_err(|_| AppError::Config(format!("环境变量 {DATABASE_URL_ENV} 未设置")))?;
        Ok(Self {
            database_url: normalize_database_url(&raw),
        })
    }
}

/// 规整数据库连接串
///
/// 规则:
/// 1. scheme `postgresql+psycopg2://` 改写为 `postgresql://`
/// 2. 用户信息段中密码部分（scheme 之后第一个 `:` 与 `@` 之间）的
///    字面 `#` 百分号编码为 `%23`；其余字符一律不动
pub fn normalize_database_url(raw: &str) -> String {
    let mut result = raw.to_string();

    if let Some(rest) = result.strip_prefix(PSYCOPG2_SCHEME) {
        result = format!("postgresql://{rest}");
    }

    let Some(scheme_pos) = result.find("://") else {
        return result;
    };
    let rest = &result[scheme_pos + 3..];

    let (Some(colon), Some(at)) = (rest.find(':'), rest.find('@')) else {
        return result;
    };
    if colon >= at {
        return result;
    }

    let password = &rest[colon + 1..at];
    if !password.contains('#') {
        return result;
    }

    let encoded = password.replace('#', "%23");
    format!(
        "{}{}:{}{}",
        &result[..scheme_pos + 3],
        &rest[..colon],
        encoded,
        &rest[at..]
    )
}

// ==========================================
// ShortfallPolicy - 缺口处置策略
// ==========================================

/// 无法填满全部缺口时对部分解的处置方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShortfallPolicy {
    /// 保留部分解并写入（默认；缺口记录到日志）
    #[default]
    KeepPartial,
    /// 丢弃该池的部分解，只写入可完整填满的池
    Discard,
}

// ==========================================
// ScheduleConfig - 引擎调参
// ==========================================

/// 排班引擎参数
///
/// 默认值即生产值；测试可按需覆盖单项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// 本周初始未排班员工的班次上限
    #[serde(default = "default_weekly_cap")]
    pub weekly_cap: i64,

    /// 平滑系数扫描步长
    #[serde(default = "default_smoothing_step")]
    pub smoothing_step: f64,

    /// 逻辑斯蒂曲线陡度
    #[serde(default = "default_logistic_steepness")]
    pub logistic_steepness: f64,

    /// 逻辑斯蒂曲线中点
    #[serde(default = "default_logistic_midpoint")]
    pub logistic_midpoint: f64,

    /// 数值容差，同时作为概率下限与浮点比较容差
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Gini 阈值基数
    #[serde(default = "default_gini_base")]
    pub gini_base: f64,

    /// Gini 阈值的小规模修正系数（除以员工数后加到基数上）
    #[serde(default = "default_gini_size_adjust")]
    pub gini_size_adjust: f64,

    /// 缺口处置策略
    #[serde(default)]
    pub shortfall_policy: ShortfallPolicy,
}

fn default_weekly_cap() -> i64 {
    2
}
fn default_smoothing_step() -> f64 {
    0.1
}
fn default_logistic_steepness() -> f64 {
    10.0
}
fn default_logistic_midpoint() -> f64 {
    0.5
}
fn default_epsilon() -> f64 {
    1e-3
}
fn default_gini_base() -> f64 {
    0.20
}
fn default_gini_size_adjust() -> f64 {
    0.30
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            weekly_cap: default_weekly_cap(),
            smoothing_step: default_smoothing_step(),
            logistic_steepness: default_logistic_steepness(),
            logistic_midpoint: default_logistic_midpoint(),
            epsilon: default_epsilon(),
            gini_base: default_gini_base(),
            gini_size_adjust: default_gini_size_adjust(),
            shortfall_policy: ShortfallPolicy::default(),
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_scheme_and_hash() {
        // 密码含 # 时编码为 %23
        assert_eq!(
            normalize_database_url("postgresql+psycopg2://u:p#q@h/db"),
            "postgresql://u:p%23q@h/db"
        );
    }

    #[test]
    fn test_normalize_scheme_only() {
        // 无 # 的连接串只换 scheme
        assert_eq!(
            normalize_database_url("postgresql+psycopg2://u:pass@h:5432/db"),
            "postgresql://u:pass@h:5432/db"
        );
    }

    #[test]
    fn test_normalize_plain_url_unchanged() {
        assert_eq!(
            normalize_database_url("postgresql://u:pass@h/db"),
            "postgresql://u:pass@h/db"
        );
    }

    #[test]
    fn test_normalize_multiple_hashes() {
        assert_eq!(
            normalize_database_url("postgresql://u:a#b#c@h/db"),
            "postgresql://u:a%23b%23c@h/db"
        );
    }

    #[test]
    fn test_normalize_no_password() {
        // 无用户信息段的连接串不动
        assert_eq!(
            normalize_database_url("postgresql://host/db"),
            "postgresql://host/db"
        );
        // 端口冒号在 @ 之后，不触发编码
        assert_eq!(
            normalize_database_url("postgresql://u@h:5432/db"),
            "postgresql://u@h:5432/db"
        );
    }

    #[test]
    fn test_normalize_not_a_url() {
        assert_eq!(normalize_database_url("not-a-url"), "not-a-url");
    }

    #[test]
    fn test_schedule_config_defaults() {
        let cfg = ScheduleConfig::default();
        assert_eq!(cfg.weekly_cap, 2);
        assert!((cfg.smoothing_step - 0.1).abs() < 1e-12);
        assert!((cfg.logistic_steepness - 10.0).abs() < 1e-12);
        assert!((cfg.gini_base - 0.20).abs() < 1e-12);
        assert_eq!(cfg.shortfall_policy, ShortfallPolicy::KeepPartial);
    }

    #[test]
    fn test_schedule_config_deserialize_partial() {
        // 部分字段缺省时回落默认值
        let cfg: ScheduleConfig = serde_json::from_str(r#"{"weekly_cap": 3}"#).unwrap();
        assert_eq!(cfg.weekly_cap, 3);
        assert!((cfg.logistic_midpoint - 0.5).abs() < 1e-12);
    }
}
