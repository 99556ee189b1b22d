// ==========================================
// 门店排班填充系统 - 员工数据仓储
// ==========================================
// 职责: 读取 users 表与历史班次聚合，本系统对员工只读
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::assignment::Worker;
use crate::domain::types::RoleClass;
use crate::repository::error::{RepositoryError, RepositoryResult};
use postgres::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// UserRepository - 员工仓储
// ==========================================

/// 员工仓储
/// 职责: users 表读取 + shifts 表历史计数聚合
pub struct UserRepository {
    conn: Arc<Mutex<Client>>,
}

impl UserRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Client>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Client>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取全部员工
    ///
    /// 按 id 升序返回，保证同一数据库状态下多次运行产出一致
    ///
    /// # 返回
    /// - Ok(Vec<Worker>): 员工列表
    /// - Err: 数据库错误
    pub fn fetch_all(&self) -> RepositoryResult<Vec<Worker>> {
        let mut conn = self.get_conn()?;

        let rows = conn.query(
            r#"
            SELECT id, user_id, status
            FROM users
            ORDER BY id
            "#,
            &[],
        )?;

        let mut workers = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i32 = row.try_get(0)?;
            let display_name: String = row.try_get(1)?;
            let status: String = row.try_get(2)?;
            workers.push(Worker {
                id,
                display_name,
                role: RoleClass::from_status(&status),
            });
        }

        Ok(workers)
    }

    /// 读取历史班次计数
    ///
    /// 每位员工先置 0，再以 shifts 表的跨周聚合覆盖；
    /// 从未排过班的员工保持 0
    ///
    /// # 参数
    /// - workers: 全量员工列表（决定计数表的键集合）
    ///
    /// # 返回
    /// - Ok(HashMap<id, count>): 员工 -> 历史班次数
    /// - Err: 数据库错误
    pub fn fetch_shift_counts(&self, workers: &[Worker]) -> RepositoryResult<HashMap<i32, i64>> {
        let mut conn = self.get_conn()?;

        let mut counts: HashMap<i32, i64> =
            workers.iter().map(|w| (w.id, 0)).collect();

        let rows = conn.query(
            r#"
            SELECT user_id, COUNT(*) AS count
            FROM shifts
            GROUP BY user_id
            "#,
            &[],
        )?;

        for row in &rows {
            let worker_id: i32 = row.try_get(0)?;
            let count: i64 = row.try_get(1)?;
            counts.insert(worker_id, count);
        }

        Ok(counts)
    }
}
