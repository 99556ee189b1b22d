// ==========================================
// 门店排班填充系统 - 核心库
// ==========================================
// 技术栈: Rust + Postgres
// 系统定位: 批处理排班填充（每周一次，由外层调度器触发）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 环境与调参
pub mod config;

// 数据库基础设施（连接初始化统一）
pub mod db;

// 日志系统
pub mod logging;

// 顶层错误类型
pub mod error;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Location, RoleClass};

// 领域实体
pub use domain::{Assignment, SlotInstance, Worker};

// 引擎
pub use engine::{FillOutcome, FlowGraph, PoolPlan, PoolReport, ShiftOrchestrator, WeekState};

// 配置
pub use config::{EnvConfig, ScheduleConfig, ShortfallPolicy};

// 错误
pub use error::{AppError, AppResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "门店排班填充系统";

// ==========================================
// 预编译检查
// ==========================================
