// ==========================================
// 商城数据导入导出 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.xml）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("XML 解析失败: {0}")]
    XmlParseError(String),

    // ===== 数据映射错误 =====
    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    // ===== 校验错误 =====
    /// 必填字段缺失（message 已本地化）
    #[error("{message}")]
    Validation { field: String, message: String },

    // ===== 转换错误 =====
    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("转换方向不存在: {0}")]
    InvalidDirection(String),

    #[error("表达式求值失败 (字段 {variable}): {message}")]
    Evaluation { variable: String, message: String },

    // ===== 持久化错误 =====
    #[error("记录写入失败: {0}")]
    Persist(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 校验错误涉及的字段（其他错误返回 None）
    pub fn field(&self) -> Option<&str> {
        match self {
            ImportError::Validation { field, .. } => Some(field),
            ImportError::TypeConversionError { field, .. } => Some(field),
            ImportError::Evaluation { variable, .. } => Some(variable),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<quick_xml::Error>
impl From<quick_xml::Error> for ImportError {
    fn from(err: quick_xml::Error) -> Self {
        ImportError::XmlParseError(err.to_string())
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        ImportError::Persist(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
