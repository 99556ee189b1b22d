// ==========================================
// 门店排班填充系统 - 引擎层
// ==========================================
// 职责: 实现排班填充的业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL, 缺口与降级必须输出日志
// ==========================================

pub mod fairness;
pub mod flow;
pub mod orchestrator;
pub mod planner;
pub mod scoring;
pub mod state;

// 重导出核心引擎
pub use flow::{FlowEdge, FlowGraph};
pub use orchestrator::{FillOutcome, PoolReport, ShiftOrchestrator};
pub use planner::{plan_pool, NodeLayout, PoolPlan};
pub use state::WeekState;
