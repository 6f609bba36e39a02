// ==========================================
// 商城数据导入导出 - 导入导出层
// ==========================================
// 职责: 外部文件 ↔ 实体记录
// 支持: CSV, XML
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod default_profiles;
pub mod default_resolver;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod file_writer;
pub mod importer_trait;
pub mod record_exporter;
pub mod record_importer;
pub mod validator;
pub mod values_transformer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use default_resolver::{
    default_fields, fix_null_sentinels, null_replacements, ComputedDefault, DefaultStrategy,
    FieldDefaultResolver, StaticDefault,
};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, UniversalFileParser, XmlParser};
pub use record_exporter::RecordExporter;
pub use record_importer::{deferred_file_path, RecordImporter};
pub use validator::{check_required_fields, rules_for, type_map, ValidatorRules};
pub use values_transformer::{Direction, ValuesTransformer};

// 重导出 Trait 接口
pub use importer_trait::{
    EvalError, ExpressionEvaluator, FileParser, NumberRangeIncrementer, RawRow, RecordSink,
    RecordSource, WriteOutcome,
};
