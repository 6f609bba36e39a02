// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、目录与文件准备等功能
// ==========================================

#![allow(dead_code)]

use shop_import_export::app::AppState;
use shop_import_export::db::{init_schema, open_sqlite_connection};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, TempDir};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    shop_import_export::logging::init_test();
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 创建共享连接的应用状态
pub fn create_test_state() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let conn = open_sqlite_connection(&db_path)?;
    let state = AppState::from_connection(db_path, Arc::new(Mutex::new(conn)));
    Ok((temp_file, state))
}

/// 创建投放目录与工作目录
///
/// # 返回
/// - TempDir: 根目录（需要保持存活）
/// - PathBuf: 投放目录
/// - PathBuf: 工作目录
pub fn create_import_dirs() -> Result<(TempDir, PathBuf, PathBuf), Box<dyn Error>> {
    let root = TempDir::new()?;
    let drop_dir = root.path().join("cron");
    let work_dir = root.path().join("work");
    fs::create_dir_all(&drop_dir)?;
    fs::create_dir_all(&work_dir)?;
    Ok((root, drop_dir, work_dir))
}

/// 写入测试文件
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// 库存 Profile 的 JSON 传输内容
pub fn stock_profile_json(name: &str) -> String {
    serde_json::json!({
        "name": name,
        "type": "articlesInStock",
        "tree": {
            "id": "root",
            "name": "Root",
            "type": "node",
            "children": [{
                "id": "1",
                "name": "articlesInStock",
                "type": "iteration",
                "adapter": "article",
                "children": [
                    { "id": "2", "name": "ordernumber", "type": "leaf", "index": 0, "shopwareField": "orderNumber" },
                    { "id": "3", "name": "instock", "type": "leaf", "index": 1, "shopwareField": "inStock", "defaultValue": 1 }
                ]
            }]
        }
    })
    .to_string()
}
