// ==========================================
// 商城数据导入导出 - 配置层
// ==========================================
// 职责: 商城配置读取（店铺作用域覆写）+ 自动导入运行参数
// 存储: config_kv 表 / shop 表
// ==========================================

pub mod auto_import_config;
pub mod config_manager;
pub mod shop_config_trait;

pub use auto_import_config::{AutoImportConfig, DEFAULT_BATCH_SIZE, DEFAULT_LOCK_TTL};
pub use config_manager::{config_keys, parse_flag, ConfigScope, ShopConfigManager};
pub use shop_config_trait::ShopConfigReader;
