// ==========================================
// 商城数据导入导出 - 应用层
// ==========================================
// 职责: 组装仓储与服务，供命令行入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::{AppState, get_default_db_path};
