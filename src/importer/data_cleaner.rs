// ==========================================
// 商城数据导入导出 - 数据清洗器实现
// ==========================================
// 职责: 按校验器类型映射表将文本单元格转换为基本类型
// 规则:
// - 数值字段的空单元格 → null
// - NULL 哨兵保持原样（由默认值解析的后置步骤处理）
// - 浮点数兼容逗号小数点（9,99）
// ==========================================

use crate::domain::{EntityType, FieldKind, FieldValue, Record, NULL_SENTINEL};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::validator::rules_for;

pub struct DataCleaner;

impl DataCleaner {
    /// 按实体类型的类型映射表转换整条记录
    ///
    /// # 参数
    /// - row_number: 文件中的行号（从 1 开始，用于错误提示）
    pub fn coerce_record(&self, record: Record, entity: EntityType, row_number: usize) -> ImportResult<Record> {
        let rules = rules_for(entity);
        let mut coerced = Record::new();

        for (field, value) in record {
            let value = match rules.field_kind(&field) {
                Some(kind) => self
                    .coerce_value(value, kind)
                    .map_err(|message| ImportError::TypeConversionError {
                        row: row_number,
                        field: field.clone(),
                        message,
                    })?,
                None => value,
            };
            coerced.insert(field, value);
        }

        Ok(coerced)
    }

    fn coerce_value(&self, value: FieldValue, kind: FieldKind) -> Result<FieldValue, String> {
        let FieldValue::Text(text) = value else {
            return Ok(value);
        };
        let trimmed = text.trim();
        if trimmed == NULL_SENTINEL {
            return Ok(FieldValue::text(trimmed));
        }

        match kind {
            FieldKind::String | FieldKind::Date => Ok(FieldValue::text(trimmed)),
            FieldKind::Int | FieldKind::Bool => {
                if trimmed.is_empty() {
                    return Ok(FieldValue::Null);
                }
                self.parse_int(trimmed)
                    .map(FieldValue::Int)
                    .ok_or_else(|| format!("无法转换为整数: {}", trimmed))
            }
            FieldKind::Float => {
                if trimmed.is_empty() {
                    return Ok(FieldValue::Null);
                }
                trimmed
                    .replace(',', ".")
                    .parse::<f64>()
                    .map(FieldValue::Float)
                    .map_err(|_| format!("无法转换为数值: {}", trimmed))
            }
        }
    }

    /// 整数解析（兼容 "3.0" 与布尔文本）
    fn parse_int(&self, text: &str) -> Option<i64> {
        if let Ok(i) = text.parse::<i64>() {
            return Some(i);
        }
        match text.to_lowercase().as_str() {
            "true" | "yes" => return Some(1),
            "false" | "no" => return Some(0),
            _ => {}
        }
        text.replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(cells: &[(&str, &str)]) -> Record {
        cells
            .iter()
            .map(|(f, v)| (f.to_string(), FieldValue::text(*v)))
            .collect()
    }

    #[test]
    fn test_coerce_stock_record() {
        let record = stock(&[("orderNumber", " SW1 "), ("inStock", "12"), ("price", "9,99"), ("note", " x ")]);
        let coerced = DataCleaner
            .coerce_record(record, EntityType::ArticlesInStock, 1)
            .unwrap();

        assert_eq!(coerced.get("orderNumber"), Some(&FieldValue::text("SW1")));
        assert_eq!(coerced.get("inStock"), Some(&FieldValue::Int(12)));
        assert_eq!(coerced.get("price"), Some(&FieldValue::Float(9.99)));
        // 未登记字段不做处理
        assert_eq!(coerced.get("note"), Some(&FieldValue::text(" x ")));
    }

    #[test]
    fn test_customer_number_is_a_typed_string_field() {
        let coerced = DataCleaner
            .coerce_record(stock(&[("customernnumber", " 1001 ")]), EntityType::Customers, 1)
            .unwrap();
        assert_eq!(coerced.get("customernnumber"), Some(&FieldValue::text("1001")));
    }

    #[test]
    fn test_empty_numeric_cell_becomes_null() {
        let coerced = DataCleaner
            .coerce_record(stock(&[("inStock", "")]), EntityType::ArticlesInStock, 1)
            .unwrap();
        assert_eq!(coerced.get("inStock"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_null_sentinel_kept() {
        let coerced = DataCleaner
            .coerce_record(stock(&[("price", "NULL")]), EntityType::ArticlesInStock, 1)
            .unwrap();
        assert_eq!(coerced.get("price"), Some(&FieldValue::text("NULL")));
    }

    #[test]
    fn test_bad_number_reports_row() {
        let err = DataCleaner
            .coerce_record(stock(&[("inStock", "many")]), EntityType::ArticlesInStock, 7)
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::TypeConversionError { row: 7, ref field, .. } if field == "inStock"
        ));
    }

    #[test]
    fn test_int_accepts_whole_float_text() {
        let coerced = DataCleaner
            .coerce_record(stock(&[("from", "3.0")]), EntityType::ArticlesPrices, 1)
            .unwrap();
        assert_eq!(coerced.get("from"), Some(&FieldValue::Int(3)));
    }
}
