// ==========================================
// 商城数据导入导出 - 导入管道 Trait
// ==========================================
// 职责: 定义导入/导出管道各阶段接口（不包含实现）
// 外部协作者（表达式引擎、持久化、编号服务）均通过窄接口注入
// ==========================================

use crate::domain::{EntityType, FieldValue, Record};
use crate::importer::error::ImportResult;
use crate::repository::RepositoryResult;
use std::error::Error;
use std::path::Path;

/// 原始行（列名 → 单元格文本，保持文件中的列顺序）
pub type RawRow = Vec<(String, String)>;

/// 表达式求值错误
pub type EvalError = Box<dyn Error + Send + Sync>;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, XmlParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过全空白行）
    /// - Err: 文件读取错误、格式错误
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// ExpressionEvaluator Trait
// ==========================================
// 用途: 不透明的表达式求值能力（不内置任何表达式语言）
// 实现者: 调用方注入；闭包自动实现
pub trait ExpressionEvaluator {
    /// 以整条记录为上下文对表达式求值
    fn evaluate(&self, expression: &str, record: &Record) -> Result<FieldValue, EvalError>;
}

impl<F> ExpressionEvaluator for F
where
    F: Fn(&str, &Record) -> Result<FieldValue, EvalError>,
{
    fn evaluate(&self, expression: &str, record: &Record) -> Result<FieldValue, EvalError> {
        self(expression, record)
    }
}

// ==========================================
// NumberRangeIncrementer Trait
// ==========================================
// 用途: 外部自增编号服务（客户编号生成）
// 实现者: NumberRangeRepository
pub trait NumberRangeIncrementer {
    /// 推进并返回指定编号区间的下一个值
    ///
    /// # 说明
    /// - 每次调用推进一次，不重试，不与记录落库同事务
    fn increment(&self, range_name: &str) -> RepositoryResult<i64>;
}

// ==========================================
// RecordSink Trait
// ==========================================
// 用途: 记录持久化接口（外部实体存储）
// 实现者: RecordStore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 已落库
    Persisted,
    /// 依赖尚未就绪，留待后续子导入
    Deferred,
}

pub trait RecordSink {
    fn write(
        &self,
        entity: EntityType,
        record: &Record,
        batch_id: &str,
    ) -> RepositoryResult<WriteOutcome>;
}

// ==========================================
// RecordSource Trait
// ==========================================
// 用途: 导出时读取已存储记录
// 实现者: RecordStore
pub trait RecordSource {
    fn load_records(&self, entity: EntityType) -> RepositoryResult<Vec<Record>>;
}
