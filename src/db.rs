// ==========================================
// 门店排班填充系统 - Postgres 连接初始化
// ==========================================
// 目标: 统一所有连接的建立路径，连接失败归类为仓储层连接错误
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use postgres::{Client, NoTls};
use std::sync::{Arc, Mutex};

/// 打开 Postgres 连接
///
/// # 参数
/// - database_url: 规整后的连接串（见 config::normalize_database_url）
///
/// # 返回
/// - Ok(Client): 已建立的同步客户端
/// - Err: 连接失败
pub fn connect(database_url: &str) -> RepositoryResult<Client> {
    Client::connect(database_url, NoTls)
        .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))
}

/// 打开连接并包装为仓储层共享句柄
pub fn connect_shared(database_url: &str) -> RepositoryResult<Arc<Mutex<Client>>> {
    Ok(Arc::new(Mutex::new(connect(database_url)?)))
}
