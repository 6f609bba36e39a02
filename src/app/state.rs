// ==========================================
// 商城数据导入导出 - 应用状态
// ==========================================
// 职责: 打开共享连接、初始化表结构、组装仓储与服务
// ==========================================

use std::sync::{Arc, Mutex};
use rusqlite::Connection;

use crate::config::{AutoImportConfig, ShopConfigManager};
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::{ExpressionEvaluator, RecordExporter};
use crate::repository::{
    NumberRangeRepository, ProfileRepository, RecordStore, RepositoryError, RepositoryResult,
};
use crate::service::{AutoImportService, ProfileService};

/// 应用状态
///
/// 所有仓储共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接
    pub conn: Arc<Mutex<Connection>>,

    /// Profile 服务
    pub profile_service: ProfileService,

    /// 商城配置（店铺作用域）
    pub shop_config: ShopConfigManager,

    /// 编号区间
    pub number_ranges: NumberRangeRepository,

    /// 实体记录存储
    pub record_store: RecordStore,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库连接（统一 PRAGMA）
    /// 2. 初始化表结构（幂等）
    /// 3. 创建所有仓储与服务
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self::from_connection(db_path, Arc::new(Mutex::new(conn))))
    }

    /// 从已初始化的连接组装（测试使用）
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            db_path,
            profile_service: ProfileService::new(ProfileRepository::from_connection(conn.clone())),
            shop_config: ShopConfigManager::from_connection(conn.clone()),
            number_ranges: NumberRangeRepository::from_connection(conn.clone()),
            record_store: RecordStore::from_connection(conn.clone()),
            conn,
        }
    }

    /// 组装自动导入服务
    pub fn auto_import_service<'a>(
        &'a self,
        config: AutoImportConfig,
        evaluator: Option<&'a dyn ExpressionEvaluator>,
    ) -> AutoImportService<'a> {
        AutoImportService::new(
            config,
            &self.profile_service,
            &self.shop_config,
            &self.number_ranges,
            &self.record_store,
        )
        .with_evaluator(evaluator)
    }

    /// 组装记录导出器
    pub fn record_exporter<'a>(&'a self, evaluator: Option<&'a dyn ExpressionEvaluator>) -> RecordExporter<'a> {
        RecordExporter::new(&self.record_store, evaluator)
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 SHOP_IMPORT_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("SHOP_IMPORT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./shop_import_export.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("shop-import-export");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("shop_import_export.db");
        }
    }

    path.to_string_lossy().to_string()
}
