// ==========================================
// 商城数据导入导出 - 内置默认 Profile
// ==========================================
// 每个实体类型一份最小映射树: root → iteration → leaf
// 叶子列名与字段名一致（字段集合 = 类型映射表 + 默认字段表）
// 隐藏 Profile（后续子导入专用）由此生成
// ==========================================

use crate::domain::{EntityType, NewProfile};
use crate::importer::default_resolver::default_fields;
use crate::importer::validator::type_map;
use serde_json::{json, Value};

/// 内置 Profile 元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultProfileMeta {
    pub name: &'static str,
    pub entity_type: EntityType,
    pub description: &'static str,
}

pub const DEFAULT_PROFILES: [DefaultProfileMeta; 7] = [
    DefaultProfileMeta {
        name: "default_customers",
        entity_type: EntityType::Customers,
        description: "客户（最小字段集）",
    },
    DefaultProfileMeta {
        name: "default_article_variants_minimal",
        entity_type: EntityType::Articles,
        description: "商品及变体（最小字段集）",
    },
    DefaultProfileMeta {
        name: "default_article_in_stock",
        entity_type: EntityType::ArticlesInStock,
        description: "商品库存",
    },
    DefaultProfileMeta {
        name: "default_article_prices",
        entity_type: EntityType::ArticlesPrices,
        description: "商品价格",
    },
    DefaultProfileMeta {
        name: "default_article_images",
        entity_type: EntityType::ArticlesImages,
        description: "商品图片",
    },
    DefaultProfileMeta {
        name: "default_categories",
        entity_type: EntityType::Categories,
        description: "分类",
    },
    DefaultProfileMeta {
        name: "default_newsletter_recipient",
        entity_type: EntityType::Newsletter,
        description: "邮件订阅",
    },
];

/// 实体类型对应的内置 Profile 元数据
pub fn default_profile(entity: EntityType) -> DefaultProfileMeta {
    DEFAULT_PROFILES
        .iter()
        .copied()
        .find(|p| p.entity_type == entity)
        .unwrap_or(DefaultProfileMeta {
            name: "default",
            entity_type: entity,
            description: "",
        })
}

/// 隐藏 Profile 名称
pub fn hidden_profile_name(entity: EntityType) -> String {
    format!("hidden_{}", entity.as_str())
}

/// 实体类型的全部已知字段（类型映射表在前，默认字段表补充，去重）
pub fn known_fields(entity: EntityType) -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = Vec::new();
    let typed = type_map(entity).iter().flat_map(|(_, fields)| fields.iter().copied());
    let defaults = default_fields(entity).iter().map(|(field, _)| *field);
    for field in typed.chain(defaults) {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

/// 构建最小映射树
pub fn default_tree(entity: EntityType) -> Value {
    let leaves: Vec<Value> = known_fields(entity)
        .into_iter()
        .enumerate()
        .map(|(index, field)| {
            json!({
                "id": format!("{}", index + 2),
                "name": field,
                "type": "leaf",
                "index": index,
                "shopwareField": field,
            })
        })
        .collect();

    json!({
        "id": "root",
        "name": "Root",
        "type": "node",
        "children": [{
            "id": "1",
            "name": entity.as_str(),
            "type": "iteration",
            "adapter": "default",
            "children": leaves,
        }]
    })
}

/// 内置 Profile 的写入结构
pub fn new_default_profile(entity: EntityType) -> NewProfile {
    NewProfile {
        name: default_profile(entity).name.to_string(),
        entity_type: entity,
        tree: default_tree(entity),
        hidden: false,
    }
}

/// 隐藏 Profile 的写入结构
pub fn new_hidden_profile(entity: EntityType) -> NewProfile {
    NewProfile {
        name: hidden_profile_name(entity),
        entity_type: entity,
        tree: default_tree(entity),
        hidden: true,
    }
}
