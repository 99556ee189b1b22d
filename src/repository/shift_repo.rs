// ==========================================
// 门店排班填充系统 - 排班数据仓储
// ==========================================
// 职责: shifts 表的周视图读取与整周事务性替换
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::types::Location;
use crate::repository::error::{RepositoryError, RepositoryResult};
use postgres::Client;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ShiftRepository - 排班仓储
// ==========================================

/// 排班仓储
/// 职责: 管理 shifts 表的周维度读写
pub struct ShiftRepository {
    conn: Arc<Mutex<Client>>,
}

impl ShiftRepository {
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

    /// 读取指定周已存在的排班
    ///
    /// 按 (slot, location) 排序返回；location 文本不可识别时报
    /// FieldValueError，不做猜测
    ///
    /// # 参数
    /// - week: 周标识（周一的 ISO 日期文本）
    ///
    /// # 返回
    /// - Ok(Vec<Assignment>): 预先存在的排班列表
    /// - Err: 数据库错误 / 字段值错误
    pub fn fetch_week(&self, week: &str) -> RepositoryResult<Vec<Assignment>> {
        let mut conn = self.get_conn()?;

        let rows = conn.query(
            r#"
            SELECT slot, location, user_id
            FROM shifts
            WHERE week = $1
            ORDER BY slot, location
            "#,
            &[&week],
        )?;

        let mut assignments = Vec::with_capacity(rows.len());
        for row in &rows {
            let slot: i32 = row.try_get(0)?;
            let location_text: String = row.try_get(1)?;
            let worker_id: i32 = row.try_get(2)?;

            let location: Location =
                location_text
                    .parse()
                    .map_err(|message| RepositoryError::FieldValueError {
                        field: "location".to_string(),
                        message,
                    })?;

            assignments.push(Assignment {
                slot,
                location,
                worker_id,
            });
        }

        Ok(assignments)
    }

    /// 整周替换排班
    ///
    /// 单个事务内先删除该周全部行，再写入合并清单，最后提交；
    /// 事务中途失败时整周数据保持原样
    ///
    /// # 参数
    /// - week: 周标识
    /// - manifest: 合并后的完整清单（预先存在 + 生成）
    ///
    /// # 返回
    /// - Ok(usize): 写入的行数
    /// - Err: 数据库错误
    pub fn replace_week(&self, week: &str, manifest: &[Assignment]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;

        let mut tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM shifts WHERE week = $1", &[&week])?;

        let insert = tx.prepare(
            r#"
            INSERT INTO shifts (user_id, week, slot, location)
            VALUES ($1, $2, $3, $4)
            "#,
        )?;

        for assignment in manifest {
            let location_text = assignment.location.as_str();
            tx.execute(
                &insert,
                &[
                    &assignment.worker_id,
                    &week,
                    &assignment.slot,
                    &location_text,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(manifest.len())
    }
}
