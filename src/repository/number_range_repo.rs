// ==========================================
// 商城数据导入导出 - 编号区间仓储
// ==========================================
// 表: number_range (name PK, number)
// 每次 increment 推进一次，区间不存在时从 1 开始
// ==========================================

use crate::db::open_sqlite_connection;
use crate::importer::importer_trait::NumberRangeIncrementer;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct NumberRangeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NumberRangeRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 设置区间当前值（下一次 increment 返回 number + 1）
    pub fn set_current(&self, range_name: &str, number: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO number_range (name, number) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET number = ?2",
            params![range_name, number],
        )?;
        Ok(())
    }

    /// 读取区间当前值
    pub fn current(&self, range_name: &str) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        let number = conn
            .query_row(
                "SELECT number FROM number_range WHERE name = ?1",
                params![range_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(number)
    }
}

impl NumberRangeIncrementer for NumberRangeRepository {
    fn increment(&self, range_name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let number = conn.query_row(
            "INSERT INTO number_range (name, number) VALUES (?1, 1)
             ON CONFLICT(name) DO UPDATE SET number = number + 1
             RETURNING number",
            params![range_name],
            |row| row.get(0),
        )?;
        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn repo() -> NumberRangeRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        NumberRangeRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_increment_advances_once_per_call() {
        let repo = repo();
        assert_eq!(repo.increment("user").unwrap(), 1);
        assert_eq!(repo.increment("user").unwrap(), 2);
        assert_eq!(repo.current("user").unwrap(), Some(2));
        assert_eq!(repo.current("invoice").unwrap(), None);
    }

    #[test]
    fn test_increment_continues_from_current() {
        let repo = repo();
        repo.set_current("user", 20000).unwrap();
        assert_eq!(repo.increment("user").unwrap(), 20001);
    }
}
