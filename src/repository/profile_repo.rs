// ==========================================
// 商城数据导入导出 - Profile 仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 表: profile / profile_expression
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{EntityType, NewProfile, Profile, TransformExpression};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const PROFILE_COLUMNS: &str = "id, name, type, tree, hidden, created_at";

/// profile 表原始行
struct ProfileRow {
    id: i64,
    name: String,
    entity_type: String,
    tree: String,
    hidden: bool,
    created_at: String,
}

impl ProfileRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            entity_type: row.get(2)?,
            tree: row.get(3)?,
            hidden: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_profile(self) -> RepositoryResult<Profile> {
        let entity_type: EntityType =
            self.entity_type
                .parse()
                .map_err(|e: crate::domain::UnknownEntityType| RepositoryError::FieldValueError {
                    field: "type".to_string(),
                    message: e.to_string(),
                })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::FieldValueError {
                field: "created_at".to_string(),
                message: e.to_string(),
            })?;

        Ok(Profile {
            id: self.id,
            name: self.name,
            entity_type,
            tree: serde_json::from_str(&self.tree)?,
            hidden: self.hidden,
            created_at,
        })
    }
}

// ==========================================
// ProfileRepository - Profile 仓储
// ==========================================
pub struct ProfileRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProfileRepository {
    /// 创建新的 ProfileRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn query_one(&self, where_clause: &str, param: &dyn rusqlite::ToSql) -> RepositoryResult<Option<Profile>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM profile WHERE {} LIMIT 1", PROFILE_COLUMNS, where_clause);
        let row = conn
            .query_row(&sql, &[param], ProfileRow::from_row)
            .optional()?;
        row.map(ProfileRow::into_profile).transpose()
    }

    /// 新建 Profile（tree 以紧凑 JSON 存储）
    ///
    /// # 错误
    /// - UniqueConstraintViolation: 名称已存在
    pub fn create(&self, profile: &NewProfile) -> RepositoryResult<Profile> {
        let tree = serde_json::to_string(&profile.tree)?;
        let created_at = Utc::now();

        let id = {
            let conn = self.get_conn()?;
            conn.execute(
                "INSERT INTO profile (name, type, tree, hidden, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    profile.name,
                    profile.entity_type.as_str(),
                    tree,
                    profile.hidden,
                    created_at.to_rfc3339(),
                ],
            )?;
            conn.last_insert_rowid()
        };

        self.find_by_id(id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Profile".to_string(),
            id: id.to_string(),
        })
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Profile>> {
        self.query_one("id = ?1", &id)
    }

    /// 按名称查询（大小写不敏感）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Profile>> {
        self.query_one("lower(name) = lower(?1)", &name)
    }

    /// 查询实体类型对应的隐藏 Profile
    pub fn find_hidden(&self, entity_type: EntityType) -> RepositoryResult<Option<Profile>> {
        self.query_one("hidden = 1 AND type = ?1", &entity_type.as_str())
    }

    /// 列出 Profile（按 id 升序）
    pub fn list(&self, include_hidden: bool) -> RepositoryResult<Vec<Profile>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM profile WHERE hidden = 0 OR ?1 ORDER BY id",
            PROFILE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![include_hidden], ProfileRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ProfileRow::into_profile).collect()
    }

    /// 为 Profile 追加转换表达式
    pub fn add_expression(&self, profile_id: i64, expression: &TransformExpression) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO profile_expression (profile_id, variable, export_conversion, import_conversion)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                profile_id,
                expression.variable,
                expression.export_conversion,
                expression.import_conversion,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 读取 Profile 的全部转换表达式（按写入顺序）
    pub fn list_expressions(&self, profile_id: i64) -> RepositoryResult<Vec<TransformExpression>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT variable, export_conversion, import_conversion
             FROM profile_expression WHERE profile_id = ?1 ORDER BY id",
        )?;
        let expressions = stmt
            .query_map(params![profile_id], |row| {
                Ok(TransformExpression {
                    variable: row.get(0)?,
                    export_conversion: row.get(1)?,
                    import_conversion: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(expressions)
    }
}
