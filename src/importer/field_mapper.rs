// ==========================================
// 商城数据导入导出 - 字段映射器实现
// ==========================================
// 职责: 文件列 ↔ 记录字段映射（依据 Profile 树叶子节点）
// 无叶子节点时列名直接作为字段名
// ==========================================

use crate::domain::{FieldMapping, FieldValue, Profile, Record};
use crate::importer::importer_trait::RawRow;

pub struct FieldMapper {
    mappings: Vec<FieldMapping>,
}

impl FieldMapper {
    pub fn new(mappings: Vec<FieldMapping>) -> Self {
        Self { mappings }
    }

    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(profile.field_mappings())
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// 是否为直通映射（Profile 未定义叶子节点）
    pub fn is_passthrough(&self) -> bool {
        self.mappings.is_empty()
    }

    /// 叶子节点上配置的默认值
    pub fn default_values(&self) -> Record {
        self.mappings
            .iter()
            .filter_map(|m| m.default_value.clone().map(|v| (m.field.clone(), v)))
            .collect()
    }

    /// 原始行 → 记录（文件中缺失的列不出现在记录中）
    pub fn map_row(&self, row: &RawRow) -> Record {
        if self.is_passthrough() {
            return row
                .iter()
                .map(|(column, value)| (column.clone(), FieldValue::text(value.as_str())))
                .collect();
        }

        let mut record = Record::new();
        for mapping in &self.mappings {
            let cell = row
                .iter()
                .find(|(column, _)| column == &mapping.column)
                .or_else(|| {
                    row.iter()
                        .find(|(column, _)| column.eq_ignore_ascii_case(&mapping.column))
                });
            if let Some((_, value)) = cell {
                record.insert(mapping.field.clone(), value.as_str());
            }
        }
        record
    }

    /// 导出表头（直通映射时取全部记录字段的并集，按首次出现顺序）
    pub fn export_headers(&self, records: &[Record]) -> Vec<String> {
        if !self.is_passthrough() {
            return self.mappings.iter().map(|m| m.column.clone()).collect();
        }

        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for field in record.keys() {
                if !headers.iter().any(|h| h == field) {
                    headers.push(field.to_string());
                }
            }
        }
        headers
    }

    /// 记录 → 导出行（与 export_headers 顺序一致，缺失字段写空串）
    pub fn record_to_row(&self, record: &Record, headers: &[String]) -> Vec<String> {
        if self.is_passthrough() {
            return headers
                .iter()
                .map(|h| record.get(h).map(FieldValue::to_cell).unwrap_or_default())
                .collect();
        }

        self.mappings
            .iter()
            .map(|m| record.get(&m.field).map(FieldValue::to_cell).unwrap_or_default())
            .collect()
    }
}
