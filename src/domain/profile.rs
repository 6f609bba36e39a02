// ==========================================
// 商城数据导入导出 - Profile 领域模型
// ==========================================
// Profile: 命名的映射定义 {id, name, type, tree}
// tree: 嵌套 JSON 节点树，叶子节点把外部列名映射到记录字段
// ==========================================

use crate::domain::record::FieldValue;
use crate::domain::types::EntityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ==========================================
// Profile - 持久化的映射定义
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub tree: Value,       // 规范化后的节点树
    pub hidden: bool,      // 隐藏 Profile（后续子导入专用，不在列表展示）
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// 叶子字段映射（树的先序顺序）
    pub fn field_mappings(&self) -> Vec<FieldMapping> {
        field_mappings(&self.tree)
    }
}

/// 待写入的 Profile（尚无 id）
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub entity_type: EntityType,
    pub tree: Value,
    pub hidden: bool,
}

// ==========================================
// ProfileData - Profile 导出传输结构
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub tree: Value,
}

impl From<Profile> for ProfileData {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            entity_type: profile.entity_type,
            tree: profile.tree,
        }
    }
}

// ==========================================
// FieldMapping - 列名 ↔ 字段名
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub column: String,                    // 文件中的列名 / XML 元素名
    pub field: String,                     // 记录字段名（shopwareField）
    pub default_value: Option<FieldValue>, // 叶子节点上的 defaultValue
}

/// 提取叶子节点的字段映射
///
/// # 规则
/// - type = "leaf" 且带 shopwareField 的节点才算映射
/// - 空字符串 / null 的 defaultValue 视为未配置
pub fn field_mappings(tree: &Value) -> Vec<FieldMapping> {
    let mut mappings = Vec::new();
    walk_nodes(tree, &mut |node| {
        if node.get("type").and_then(Value::as_str) != Some("leaf") {
            return;
        }
        let (Some(column), Some(field)) = (
            node.get("name").and_then(Value::as_str),
            node.get("shopwareField").and_then(Value::as_str),
        ) else {
            return;
        };

        let default_value = node
            .get("defaultValue")
            .filter(|v| !v.is_null() && v.as_str() != Some(""))
            .and_then(|v| serde_json::from_value::<FieldValue>(v.clone()).ok());

        mappings.push(FieldMapping {
            column: column.to_string(),
            field: field.to_string(),
            default_value,
        });
    });
    mappings
}

/// 迭代节点名（XML 导出时的行元素名）
pub fn iteration_node_name(tree: &Value) -> Option<String> {
    let mut found = None;
    walk_nodes(tree, &mut |node| {
        if found.is_none() && node.get("type").and_then(Value::as_str) == Some("iteration") {
            found = node.get("name").and_then(Value::as_str).map(str::to_string);
        }
    });
    found
}

/// 先序遍历所有节点（对象且带 children 的递归）
pub fn walk_nodes<F: FnMut(&Value)>(node: &Value, visit: &mut F) {
    match node {
        Value::Object(map) => {
            visit(node);
            if let Some(children) = map.get("children") {
                walk_nodes(children, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_nodes(item, visit);
            }
        }
        _ => {}
    }
}

// ==========================================
// TransformExpression - 转换表达式
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformExpression {
    pub variable: String,
    #[serde(default)]
    pub export_conversion: String,
    #[serde(default)]
    pub import_conversion: String,
}

impl TransformExpression {
    pub fn new(
        variable: impl Into<String>,
        export_conversion: impl Into<String>,
        import_conversion: impl Into<String>,
    ) -> Self {
        Self {
            variable: variable.into(),
            export_conversion: export_conversion.into(),
            import_conversion: import_conversion.into(),
        }
    }
}
