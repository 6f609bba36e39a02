// ==========================================
// 商城数据导入导出 - 服务层错误类型
// ==========================================
// 职责: Profile 导入导出 / 自动导入的错误分类
// 用户可见的消息在构造时完成本地化
// ==========================================

use crate::i18n;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 服务层错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    // ===== Profile 导入错误 =====
    /// 上传文件扩展名不是 json
    #[error("{0}")]
    Format(String),

    /// 上传文件内容为空
    #[error("{0}")]
    EmptyContent(String),

    /// JSON 无效或缺少 name/type/tree
    #[error("{0}")]
    Schema(String),

    /// Profile 名称重复
    #[error("{0}")]
    Duplicate(String),

    /// 其他持久化失败
    #[error("{0}")]
    ProfileImport(String),

    // ===== 查询错误 =====
    #[error("{0}")]
    NotFound(String),

    // ===== 自动导入错误 =====
    #[error("{0}")]
    NoProfileForFile(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("文件操作失败: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn format() -> Self {
        ServiceError::Format(i18n::t("profile.format_error"))
    }

    pub fn empty_content() -> Self {
        ServiceError::EmptyContent(i18n::t("profile.empty_content"))
    }

    pub fn schema(detail: impl AsRef<str>) -> Self {
        ServiceError::Schema(i18n::t_with_args("profile.schema_error", &[("detail", detail.as_ref())]))
    }

    pub fn duplicate(name: &str) -> Self {
        ServiceError::Duplicate(i18n::t_with_args("profile.duplicate", &[("name", name)]))
    }

    pub fn profile_import(detail: impl AsRef<str>) -> Self {
        ServiceError::ProfileImport(i18n::t_with_args("profile.import_error", &[("detail", detail.as_ref())]))
    }

    pub fn not_found(id: i64) -> Self {
        ServiceError::NotFound(i18n::t_with_args("profile.not_found", &[("id", &id.to_string())]))
    }

    pub fn no_profile_for_file(file_name: &str) -> Self {
        ServiceError::NoProfileForFile(i18n::t_with_args("cronjob.no_profile", &[("name", file_name)]))
    }
}

/// Result 类型别名
pub type ServiceResult<T> = Result<T, ServiceError>;
