// ==========================================
// 商城数据导入导出 - 表达式值转换器
// ==========================================
// 职责: 按 Profile 表达式逐字段改写记录
// 方向: export = 出库（forward） / import = 入库（backward）
// 规则: 仅当表达式非空，且求值结果为真值或字面量零时覆盖原值
// ==========================================

use crate::domain::{FieldValue, Record, TransformExpression};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::ExpressionEvaluator;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Export,
    Import,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Export => "export",
            Direction::Import => "import",
        }
    }

    fn conversion<'e>(&self, expression: &'e TransformExpression) -> &'e str {
        match self {
            Direction::Export => &expression.export_conversion,
            Direction::Import => &expression.import_conversion,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "export" => Ok(Direction::Export),
            "import" => Ok(Direction::Import),
            other => Err(ImportError::InvalidDirection(other.to_string())),
        }
    }
}

// ==========================================
// ValuesTransformer
// ==========================================
pub struct ValuesTransformer<'a> {
    expressions: &'a [TransformExpression],
    evaluator: Option<&'a dyn ExpressionEvaluator>,
}

impl<'a> ValuesTransformer<'a> {
    pub fn new(expressions: &'a [TransformExpression], evaluator: Option<&'a dyn ExpressionEvaluator>) -> Self {
        Self {
            expressions,
            evaluator,
        }
    }

    /// 按方向转换全部记录（原地改写）
    pub fn transform(&self, direction: Direction, records: &mut [Record]) -> ImportResult<()> {
        // 变量名 → 当前方向的表达式（同名变量保留首次出现的位置，以后者的表达式为准）
        let mut conversions: Vec<(&str, &str)> = Vec::new();
        for expression in self.expressions {
            let conversion = direction.conversion(expression);
            match conversions.iter_mut().find(|(v, _)| *v == expression.variable) {
                Some(slot) => slot.1 = conversion,
                None => conversions.push((expression.variable.as_str(), conversion)),
            }
        }

        if conversions.is_empty() {
            return Ok(());
        }

        for record in records.iter_mut() {
            self.transform_record(&conversions, record)?;
        }
        Ok(())
    }

    /// 字符串方向入口（"export" / "import"）
    pub fn transform_str(&self, direction: &str, records: &mut [Record]) -> ImportResult<()> {
        self.transform(direction.parse()?, records)
    }

    /// 出库方向
    pub fn transform_forward(&self, records: &mut [Record]) -> ImportResult<()> {
        self.transform(Direction::Export, records)
    }

    /// 入库方向
    pub fn transform_backward(&self, records: &mut [Record]) -> ImportResult<()> {
        self.transform(Direction::Import, records)
    }

    /// 按表达式定义顺序逐个求值，后面的表达式可见前面的改写结果
    fn transform_record(&self, conversions: &[(&str, &str)], record: &mut Record) -> ImportResult<()> {
        for (variable, conversion) in conversions {
            if !record.is_set(variable) || conversion.trim().is_empty() {
                continue;
            }
            let evaluator = self.evaluator.ok_or_else(|| {
                ImportError::Configuration(format!("字段 {} 配置了转换表达式，但未提供表达式求值器", variable))
            })?;

            let result = evaluator
                .evaluate(conversion, record)
                .map_err(|e| ImportError::Evaluation {
                    variable: variable.to_string(),
                    message: e.to_string(),
                })?;

            if result.is_truthy() || result.is_literal_zero() {
                record.insert(*variable, result);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::importer_trait::EvalError;

    /// 测试用求值器: 支持 "value * <factor>" 与 "literal:<text>"
    fn evaluator(expression: &str, record: &Record) -> Result<FieldValue, EvalError> {
        if let Some(text) = expression.strip_prefix("literal:") {
            return Ok(match text {
                "false" => FieldValue::Bool(false),
                "0" => FieldValue::Int(0),
                other => FieldValue::text(other),
            });
        }
        let factor: f64 = expression
            .strip_prefix("value * ")
            .ok_or("unsupported expression")?
            .parse()?;
        let price = record.get("price").and_then(FieldValue::as_f64).ok_or("no price")?;
        Ok(FieldValue::Float((price * factor * 100.0).round() / 100.0))
    }

    fn price_record(price: i64) -> Record {
        [("price", FieldValue::Int(price))].into_iter().collect()
    }

    #[test]
    fn test_export_expression_rewrites_field() {
        let expressions = vec![TransformExpression::new("price", "value * 1.19", "")];
        let transformer = ValuesTransformer::new(&expressions, Some(&evaluator));

        let mut records = vec![price_record(100)];
        transformer.transform_forward(&mut records).unwrap();

        assert_eq!(records[0].get("price"), Some(&FieldValue::Float(119.0)));
    }

    #[test]
    fn test_import_without_conversion_is_noop() {
        let expressions = vec![TransformExpression::new("price", "value * 1.19", "")];
        let transformer = ValuesTransformer::new(&expressions, None);

        let mut records = vec![price_record(100)];
        transformer.transform_backward(&mut records).unwrap();

        assert_eq!(records[0], price_record(100));
    }

    #[test]
    fn test_literal_zero_overwrites_but_empty_values_do_not() {
        let expressions = vec![
            TransformExpression::new("a", "literal:0", ""),
            TransformExpression::new("b", "literal:", ""),
            TransformExpression::new("c", "literal:false", ""),
        ];
        let transformer = ValuesTransformer::new(&expressions, Some(&evaluator));

        let mut records = vec![[
            ("a", FieldValue::text("x")),
            ("b", FieldValue::text("y")),
            ("c", FieldValue::text("z")),
        ]
        .into_iter()
        .collect::<Record>()];
        transformer.transform_forward(&mut records).unwrap();

        assert_eq!(records[0].get("a"), Some(&FieldValue::Int(0)));
        assert_eq!(records[0].get("b"), Some(&FieldValue::text("y")));
        assert_eq!(records[0].get("c"), Some(&FieldValue::text("z")));
    }

    #[test]
    fn test_unset_fields_are_skipped() {
        let expressions = vec![TransformExpression::new("price", "value * 2", "")];
        let transformer = ValuesTransformer::new(&expressions, None);

        let mut records = vec![[("price", FieldValue::Null)].into_iter().collect::<Record>()];
        assert!(transformer.transform_forward(&mut records).is_ok());
    }

    #[test]
    fn test_missing_evaluator_is_configuration_error() {
        let expressions = vec![TransformExpression::new("price", "value * 2", "")];
        let transformer = ValuesTransformer::new(&expressions, None);

        let err = transformer
            .transform_forward(&mut [price_record(1)])
            .unwrap_err();
        assert!(matches!(err, ImportError::Configuration(_)));
    }

    #[test]
    fn test_invalid_direction() {
        let transformer = ValuesTransformer::new(&[], None);
        let err = transformer.transform_str("sideways", &mut []).unwrap_err();
        assert!(matches!(err, ImportError::InvalidDirection(d) if d == "sideways"));
        assert!(transformer.transform_str("import", &mut []).is_ok());
    }

    #[test]
    fn test_evaluator_failure_propagates() {
        let expressions = vec![TransformExpression::new("price", "nonsense", "")];
        let transformer = ValuesTransformer::new(&expressions, Some(&evaluator));

        let err = transformer
            .transform_forward(&mut [price_record(1)])
            .unwrap_err();
        assert_eq!(err.field(), Some("price"));
    }
}
