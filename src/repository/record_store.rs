// ==========================================
// 商城数据导入导出 - 实体记录存储
// ==========================================
// 表: entity_record (entity_type, record_key) 唯一
// 记录以 JSON 存储，同一业务主键重复导入时覆盖
// 依赖未就绪的记录返回 Deferred（变体缺主商品 / 图片缺商品）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{EntityType, Record};
use crate::importer::importer_trait::{RecordSink, RecordSource, WriteOutcome};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct RecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl RecordStore {
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

    fn exists(conn: &Connection, entity: EntityType, key: &str) -> RepositoryResult<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM entity_record WHERE entity_type = ?1 AND record_key = ?2",
                params![entity.as_str(), key],
                |_row| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }

    /// 记录写入前需要已存在的商品编号
    fn required_article(entity: EntityType, record: &Record) -> Option<String> {
        let text = |field: &str| {
            record
                .get(field)
                .map(|v| v.to_string())
                .filter(|v| !v.trim().is_empty())
        };

        match entity {
            EntityType::Articles => {
                let main_number = text("mainNumber")?;
                let order_number = text("orderNumber")?;
                (main_number != order_number).then_some(main_number)
            }
            EntityType::ArticlesImages => text("ordernumber"),
            _ => None,
        }
    }

    /// 按业务主键读取记录
    pub fn find(&self, entity: EntityType, key: &str) -> RepositoryResult<Option<Record>> {
        let conn = self.get_conn()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM entity_record WHERE entity_type = ?1 AND record_key = ?2",
                params![entity.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(data.map(|d| serde_json::from_str(&d)).transpose()?)
    }

    /// 统计实体记录数
    pub fn count(&self, entity: EntityType) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entity_record WHERE entity_type = ?1",
            params![entity.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl RecordSink for RecordStore {
    fn write(&self, entity: EntityType, record: &Record, batch_id: &str) -> RepositoryResult<WriteOutcome> {
        let key_field = entity.key_field();
        let key = record
            .get(key_field)
            .map(|v| v.to_string())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| RepositoryError::FieldValueError {
                field: key_field.to_string(),
                message: "业务主键为空".to_string(),
            })?;

        let conn = self.get_conn()?;
        if let Some(article) = Self::required_article(entity, record) {
            if !Self::exists(&conn, EntityType::Articles, &article)? {
                return Ok(WriteOutcome::Deferred);
            }
        }

        let data = serde_json::to_string(record)?;
        conn.execute(
            "INSERT INTO entity_record (entity_type, record_key, data, batch_id, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(entity_type, record_key)
             DO UPDATE SET data = excluded.data, batch_id = excluded.batch_id, imported_at = excluded.imported_at",
            params![entity.as_str(), key, data, batch_id, Utc::now().to_rfc3339()],
        )?;
        Ok(WriteOutcome::Persisted)
    }
}

impl RecordSource for RecordStore {
    fn load_records(&self, entity: EntityType) -> RepositoryResult<Vec<Record>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT data FROM entity_record WHERE entity_type = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![entity.as_str()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.iter()
            .map(|data| serde_json::from_str(data).map_err(RepositoryError::from))
            .collect()
    }
}
