// ==========================================
// 商城数据导入导出 - 记录导入管道
// ==========================================
// 流程:
// 1. 文件解析（CSV / XML）
// 2. 列 → 字段映射（Profile 树叶子节点）
// 3. 类型转换（校验器类型映射表）
// 4. 默认值补全 + NULL 哨兵替换
// 5. 必填字段校验
// 6. 入库方向表达式转换
// 7. 分批落库；依赖未就绪的记录写入临时 CSV 供后续子导入
// ==========================================

use crate::config::ShopConfigReader;
use crate::domain::{EntityType, FileFormat, ImportSummary, Profile, Record, TransformExpression};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::default_resolver::FieldDefaultResolver;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::file_writer::write_csv;
use crate::importer::importer_trait::{
    ExpressionEvaluator, NumberRangeIncrementer, RecordSink, WriteOutcome,
};
use crate::importer::validator::check_required_fields;
use crate::importer::values_transformer::ValuesTransformer;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 延后记录临时文件路径: <work_dir>/<file>-<entity>-tmp.csv
pub fn deferred_file_path(work_directory: &Path, file_name: &str, entity: EntityType) -> PathBuf {
    work_directory.join(format!("{}-{}-tmp.csv", file_name, entity.as_str()))
}

pub struct RecordImporter<'a> {
    config: &'a dyn ShopConfigReader,
    numbers: &'a dyn NumberRangeIncrementer,
    sink: &'a dyn RecordSink,
    evaluator: Option<&'a dyn ExpressionEvaluator>,
    work_directory: PathBuf,
    batch_size: usize,
}

impl<'a> RecordImporter<'a> {
    pub fn new(
        config: &'a dyn ShopConfigReader,
        numbers: &'a dyn NumberRangeIncrementer,
        sink: &'a dyn RecordSink,
        work_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            numbers,
            sink,
            evaluator: None,
            work_directory: work_directory.into(),
            batch_size: crate::config::DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Option<&'a dyn ExpressionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// 按扩展名识别格式后导入
    pub fn import_path(
        &self,
        profile: &Profile,
        expressions: &[TransformExpression],
        path: &Path,
    ) -> ImportResult<ImportSummary> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        let format = FileFormat::from_extension(&ext).ok_or(ImportError::UnsupportedFormat(ext))?;
        self.import_file(profile, expressions, path, format)
    }

    /// 导入单个文件
    ///
    /// # 错误
    /// - 解析/类型转换/校验/表达式/落库任一失败即中止本文件
    #[instrument(skip(self, profile, expressions), fields(profile = %profile.name, adapter = %profile.entity_type))]
    pub fn import_file(
        &self,
        profile: &Profile,
        expressions: &[TransformExpression],
        path: &Path,
        format: FileFormat,
    ) -> ImportResult<ImportSummary> {
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let entity = profile.entity_type;
        info!(batch_id = %batch_id, file = %path.display(), format = %format, "开始导入文件");

        debug!("步骤 1: 解析文件");
        let rows = UniversalFileParser.parse_as(path, format, Some(entity.row_element()))?;
        let count = rows.len();
        info!(total_rows = count, "文件解析完成");

        let mapper = FieldMapper::from_profile(profile);
        let default_values = mapper.default_values();
        let resolver = FieldDefaultResolver::new(self.config, self.numbers);
        let transformer = ValuesTransformer::new(expressions, self.evaluator);

        let mut position = 0;
        let mut deferred: Vec<Record> = Vec::new();

        for chunk in rows.chunks(self.batch_size) {
            let mut records = Vec::with_capacity(chunk.len());
            for (offset, row) in chunk.iter().enumerate() {
                let row_number = position + offset + 1;
                let record = mapper.map_row(row);
                let record = DataCleaner.coerce_record(record, entity, row_number)?;
                let record = resolver.resolve_defaults(record, &default_values, entity);
                check_required_fields(&record, entity).map_err(|e| {
                    warn!(row_number, error = %e, "必填字段校验失败");
                    e
                })?;
                records.push(record);
            }

            transformer.transform_backward(&mut records)?;

            for record in records {
                match self.sink.write(entity, &record, &batch_id)? {
                    WriteOutcome::Persisted => {}
                    WriteOutcome::Deferred => deferred.push(record),
                }
            }

            position += chunk.len();
            info!(position, total = count, "批次落库完成");
        }

        let tmp_file = if deferred.is_empty() {
            None
        } else {
            Some(self.write_deferred(path, entity, &deferred)?)
        };

        let summary = ImportSummary {
            batch_id,
            adapter: entity,
            position,
            count,
            deferred: deferred.len(),
            tmp_file,
            elapsed_ms: started.elapsed().as_millis(),
        };
        info!(
            position = summary.position,
            deferred = summary.deferred,
            elapsed_ms = summary.elapsed_ms as u64,
            "文件导入完成"
        );
        Ok(summary)
    }

    fn write_deferred(&self, source: &Path, entity: EntityType, records: &[Record]) -> ImportResult<PathBuf> {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = deferred_file_path(&self.work_directory, &file_name, entity);

        let mapper = FieldMapper::new(Vec::new());
        let headers = mapper.export_headers(records);
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| mapper.record_to_row(r, &headers))
            .collect();
        write_csv(&path, &headers, &rows)?;

        info!(count = records.len(), tmp_file = %path.display(), "延后记录已写出");
        Ok(path)
    }
}
