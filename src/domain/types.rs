// ==========================================
// 商城数据导入导出 - 领域类型定义
// ==========================================
// 职责: 实体类型（Profile.type / 适配器名）与字段基本类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 实体类型 (Entity Type)
// ==========================================
// 序列化格式: 与 Profile 传输格式中的 type 字段一致（camelCase）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Customers,       // 客户
    Articles,        // 商品（含变体）
    ArticlesInStock, // 商品库存
    ArticlesPrices,  // 商品价格
    ArticlesImages,  // 商品图片
    Categories,      // 分类
    Newsletter,      // 邮件订阅
}

impl EntityType {
    /// 全部实体类型（用于表驱动测试与遍历）
    pub const ALL: [EntityType; 7] = [
        EntityType::Customers,
        EntityType::Articles,
        EntityType::ArticlesInStock,
        EntityType::ArticlesPrices,
        EntityType::ArticlesImages,
        EntityType::Categories,
        EntityType::Newsletter,
    ];

    /// 传输/存储用名称
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Customers => "customers",
            EntityType::Articles => "articles",
            EntityType::ArticlesInStock => "articlesInStock",
            EntityType::ArticlesPrices => "articlesPrices",
            EntityType::ArticlesImages => "articlesImages",
            EntityType::Categories => "categories",
            EntityType::Newsletter => "newsletter",
        }
    }

    /// 记录业务主键字段（entity_record 去重依据）
    pub fn key_field(&self) -> &'static str {
        match self {
            EntityType::Customers => "email",
            EntityType::Articles => "orderNumber",
            EntityType::ArticlesInStock => "orderNumber",
            EntityType::ArticlesPrices => "orderNumber",
            EntityType::ArticlesImages => "image",
            EntityType::Categories => "categoryId",
            EntityType::Newsletter => "email",
        }
    }

    /// XML 导出时单条记录的元素名
    pub fn row_element(&self) -> &'static str {
        match self {
            EntityType::Customers => "customer",
            EntityType::Articles => "article",
            EntityType::ArticlesInStock => "article",
            EntityType::ArticlesPrices => "price",
            EntityType::ArticlesImages => "image",
            EntityType::Categories => "category",
            EntityType::Newsletter => "user",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知实体类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntityType(pub String);

impl fmt::Display for UnknownEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未知实体类型: {}", self.0)
    }
}

impl std::error::Error for UnknownEntityType {}

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 兼容单数写法与大小写差异
        match s.trim().to_lowercase().as_str() {
            "customers" | "customer" => Ok(EntityType::Customers),
            "articles" | "article" => Ok(EntityType::Articles),
            "articlesinstock" => Ok(EntityType::ArticlesInStock),
            "articlesprices" => Ok(EntityType::ArticlesPrices),
            "articlesimages" => Ok(EntityType::ArticlesImages),
            "categories" | "category" => Ok(EntityType::Categories),
            "newsletter" => Ok(EntityType::Newsletter),
            _ => Err(UnknownEntityType(s.to_string())),
        }
    }
}

// ==========================================
// 字段基本类型 (Field Kind)
// ==========================================
// 用途: 校验器类型映射表 + NULL 替换表的分组键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Int,
    Float,
    Bool,
    Date,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::Date => "date",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 文件格式 (File Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xml,
}

impl FileFormat {
    /// 按扩展名识别（大小写不敏感），其他扩展名返回 None
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xml" => Some(FileFormat::Xml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
