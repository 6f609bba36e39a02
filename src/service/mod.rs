// ==========================================
// 商城数据导入导出 - 服务层
// ==========================================
// 职责: Profile 控制面 + 定时自动导入编排
// 依赖: repository / importer / config
// ==========================================

pub mod auto_import_service;
pub mod error;
pub mod lock;
pub mod profile_service;

pub use auto_import_service::{AutoImportOutcome, AutoImportReport, AutoImportService};
pub use error::{ServiceError, ServiceResult};
pub use lock::{LockGuard, LockState, LOCK_FILE_NAME};
pub use profile_service::{ProfileService, UploadedFile};
