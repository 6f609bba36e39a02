// ==========================================
// 商城数据导入导出 - 商城配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope) / shop 表（店铺层级）
// ==========================================

use crate::config::shop_config_trait::ShopConfigReader;
use crate::db::open_sqlite_connection;
use crate::repository::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ConfigScope - 配置作用域
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Global,              // 全局
    Shop { shop_id: i64 }, // 店铺（主店铺或子店铺）
}

impl ConfigScope {
    /// config_kv.scope_id 存储值
    pub fn scope_id(&self) -> String {
        match self {
            ConfigScope::Global => "global".to_string(),
            ConfigScope::Shop { shop_id } => shop_id.to_string(),
        }
    }
}

// ==========================================
// ShopConfigManager - 商城配置管理器
// ==========================================
pub struct ShopConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ShopConfigManager {
    /// 创建新的 ShopConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ShopConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, scope: ConfigScope, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![scope.scope_id(), key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（存在则覆盖）
    pub fn set_config_value(&self, scope: ConfigScope, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3",
            params![scope.scope_id(), key, value],
        )?;
        Ok(())
    }

    /// 登记店铺（main_id 为空表示主店铺）
    pub fn upsert_shop(&self, shop_id: i64, main_id: Option<i64>, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO shop (id, main_id, name) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET main_id = ?2, name = ?3",
            params![shop_id, main_id, name],
        )?;
        Ok(())
    }

    /// 全局布尔开关（"1"/"true"/"yes"/"on" 视为开启）
    pub fn get_global_flag(&self, key: &str) -> RepositoryResult<bool> {
        Ok(self
            .get_config_value(ConfigScope::Global, key)?
            .map(|v| parse_flag(&v))
            .unwrap_or(false))
    }
}

/// 配置文本解析为布尔值
pub fn parse_flag(raw: &str) -> bool {
    let normalized = raw.trim().trim_matches('"').to_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

impl ShopConfigReader for ShopConfigManager {
    fn global_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        self.get_config_value(ConfigScope::Global, key)
    }

    fn shop_value(&self, shop_id: i64, key: &str) -> RepositoryResult<Option<String>> {
        self.get_config_value(ConfigScope::Shop { shop_id }, key)
    }

    fn main_shop_id(&self, shop_id: i64) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        let main_id = conn
            .query_row(
                "SELECT main_id FROM shop WHERE id = ?1",
                params![shop_id],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?;
        Ok(main_id.flatten())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 客户默认值
    pub const DEFAULT_PAYMENT: &str = "defaultpayment"; // 默认支付方式（JSON 序列化存储）
    pub const DEFAULT_PASSWORD_ENCODER: &str = "default_password_encoder";
    pub const MANAGED_CUSTOMER_NUMBERS: &str = "shopware_managed_customer_numbers";

    // 编号区间
    pub const CUSTOMER_NUMBER_RANGE: &str = "user";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn manager() -> ShopConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ShopConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_scoped_values_do_not_leak() {
        let config = manager();
        config
            .set_config_value(ConfigScope::Shop { shop_id: 2 }, config_keys::DEFAULT_PAYMENT, "7")
            .unwrap();

        assert_eq!(config.shop_value(2, config_keys::DEFAULT_PAYMENT).unwrap(), Some("7".to_string()));
        assert_eq!(config.global_value(config_keys::DEFAULT_PAYMENT).unwrap(), None);
        assert_eq!(config.shop_value(3, config_keys::DEFAULT_PAYMENT).unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let config = manager();
        config.set_config_value(ConfigScope::Global, "k", "a").unwrap();
        config.set_config_value(ConfigScope::Global, "k", "b").unwrap();
        assert_eq!(config.global_value("k").unwrap(), Some("b".to_string()));
    }

    #[test]
    fn test_main_shop_lookup() {
        let config = manager();
        config.upsert_shop(1, None, "Main").unwrap();
        config.upsert_shop(2, Some(1), "Sub").unwrap();

        assert_eq!(config.main_shop_id(2).unwrap(), Some(1));
        assert_eq!(config.main_shop_id(1).unwrap(), None);
        assert_eq!(config.main_shop_id(99).unwrap(), None);
    }

    #[test]
    fn test_global_flag() {
        let config = manager();
        assert!(!config.get_global_flag(config_keys::MANAGED_CUSTOMER_NUMBERS).unwrap());
        config
            .set_config_value(ConfigScope::Global, config_keys::MANAGED_CUSTOMER_NUMBERS, "true")
            .unwrap();
        assert!(config.get_global_flag(config_keys::MANAGED_CUSTOMER_NUMBERS).unwrap());
    }
}
