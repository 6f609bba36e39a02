// ==========================================
// 商城数据导入导出 - 记录模型
// ==========================================
// Record: 一行导入/导出数据（字段名 → 标量值，保持插入顺序）
// 无固定 schema，字段集合由当前 Profile 决定
// ==========================================

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 数据库 NULL 的文本哨兵值（导出文件中的 NULL 单元格）
pub const NULL_SENTINEL: &str = "NULL";

// ==========================================
// FieldValue - 字段标量值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// 是否为数据库 NULL 哨兵（null 或文本 "NULL"，区分大小写）
    pub fn is_null_sentinel(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s == NULL_SENTINEL,
            _ => false,
        }
    }

    /// 空值判定：null / "" / "0" / 0 / 0.0 / false
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Int(i) => *i == 0,
            FieldValue::Float(f) => *f == 0.0,
            FieldValue::Text(s) => s.is_empty() || s == "0",
        }
    }

    pub fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    /// 字面量零（"0" 或整数 0）
    pub fn is_literal_zero(&self) -> bool {
        matches!(self, FieldValue::Int(0)) || matches!(self, FieldValue::Text(s) if s == "0")
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Bool(b) => Some(*b as i64),
            FieldValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// 文件写出用文本（null → 空串）
    pub fn to_cell(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", *b as i32),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

// ==========================================
// Record - 有序字段映射
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// 字段存在且非 null
    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).map_or(false, |v| !v.is_null())
    }

    /// 插入或覆盖（覆盖时保持原位置）
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.shift_remove(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FieldValue)> {
        self.fields
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_semantics() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::text("").is_empty());
        assert!(FieldValue::text("0").is_empty());
        assert!(FieldValue::Int(0).is_empty());
        assert!(FieldValue::Bool(false).is_empty());
        assert!(FieldValue::text("a").is_truthy());
        assert!(FieldValue::Float(0.5).is_truthy());
    }

    #[test]
    fn test_literal_zero() {
        assert!(FieldValue::text("0").is_literal_zero());
        assert!(FieldValue::Int(0).is_literal_zero());
        assert!(!FieldValue::text("").is_literal_zero());
        assert!(!FieldValue::Bool(false).is_literal_zero());
    }

    #[test]
    fn test_null_sentinel() {
        assert!(FieldValue::Null.is_null_sentinel());
        assert!(FieldValue::text("NULL").is_null_sentinel());
        assert!(!FieldValue::text("null").is_null_sentinel());
        assert!(!FieldValue::text("Null").is_null_sentinel());
        assert!(!FieldValue::text(" NULL ").is_null_sentinel());
        assert!(!FieldValue::text("").is_null_sentinel());
    }

    #[test]
    fn test_record_insert_keeps_order() {
        let mut record = Record::new();
        record.insert("b", 1i64);
        record.insert("a", "x");
        record.insert("b", 2i64);

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&FieldValue::Int(2)));
    }

    #[test]
    fn test_record_remove_keeps_order_of_rest() {
        let mut record: Record = [("a", 1i64), ("b", 2i64), ("c", 3i64)].into_iter().collect();

        assert_eq!(record.remove("a"), Some(FieldValue::Int(1)));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(record.remove("a"), None);
    }

    #[test]
    fn test_record_is_set() {
        let record: Record = [("a", FieldValue::Null), ("b", FieldValue::text(""))]
            .into_iter()
            .collect();
        assert!(!record.is_set("a"));
        assert!(record.is_set("b"));
        assert!(!record.is_set("c"));
    }

    #[test]
    fn test_record_json_preserves_order() {
        let record: Record = [("price", FieldValue::Float(9.5)), ("name", FieldValue::text("x"))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"price":9.5,"name":"x"}"#);

        let back: Record = serde_json::from_str(r#"{"z":1,"a":null}"#).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(back.get("z"), Some(&FieldValue::Int(1)));
        assert_eq!(back.get("a"), Some(&FieldValue::Null));
    }
}
