// ==========================================
// 门店排班填充系统 - 顶层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 排班缺口不是错误，由 FillOutcome 报告承载
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 进程级错误分类
///
/// 三类致命错误，统一落到 logs/error.log 并以非零码退出:
/// - Usage: 命令行参数缺失或不合法，不触达数据库
/// - Config: 环境配置缺失或不可解析，不触达数据库
/// - Storage: 连接/查询/事务失败，附带驱动层原始信息
#[derive(Error, Debug)]
pub enum AppError {
    #[error("用法错误: {0}")]
    Usage(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("存储错误: {0}")]
    Storage(#[from] RepositoryError),
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
