// ==========================================
// 门店排班填充系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<postgres::Error>
impl From<postgres::Error> for RepositoryError {
    fn from(err: postgres::Error) -> Self {
        use postgres::error::SqlState;

        if let Some(db_err) = err.as_db_error() {
            let code = db_err.code();
            if *code == SqlState::UNIQUE_VIOLATION {
                RepositoryError::UniqueConstraintViolation(db_err.message().to_string())
            } else if *code == SqlState::FOREIGN_KEY_VIOLATION {
                RepositoryError::ForeignKeyViolation(db_err.message().to_string())
            } else {
                RepositoryError::DatabaseQueryError(db_err.message().to_string())
            }
        } else {
            RepositoryError::DatabaseQueryError(err.to_string())
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
