// ==========================================
// 商城数据导入导出 - 核心库
// ==========================================
// 功能: CSV / XML ↔ 商城实体记录
// 包含: 字段默认值、必填校验、表达式转换、Profile 管理、定时批量导入
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录、Profile、实体类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入导出层 - 文件 ↔ 记录
pub mod importer;

// 配置层 - 商城配置与运行参数
pub mod config;

// 服务层 - Profile 控制面与自动导入
pub mod service;

// 数据库基础设施（连接初始化/PRAGMA 统一/表结构）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    EntityType, FieldValue, FileFormat, ImportSummary, Profile, ProfileData, Record,
    TransformExpression,
};

// 导入导出
pub use importer::{
    Direction, ExpressionEvaluator, FieldDefaultResolver, ImportError, RecordExporter,
    RecordImporter, ValuesTransformer,
};

// 服务
pub use service::{
    AutoImportOutcome, AutoImportReport, AutoImportService, ProfileService, ServiceError,
    UploadedFile,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商城数据导入导出";
