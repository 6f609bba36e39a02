// ==========================================
// 商城数据导入导出 - 记录导出管道
// ==========================================
// 流程: 读取实体记录 → 出库方向表达式转换 → 字段 → 列映射 → 写出 CSV / XML
// ==========================================

use crate::domain::{iteration_node_name, FileFormat, Profile, TransformExpression};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_writer::{write_csv, write_xml};
use crate::importer::importer_trait::{ExpressionEvaluator, RecordSource};
use crate::importer::values_transformer::ValuesTransformer;
use std::path::Path;
use tracing::{info, instrument};

pub struct RecordExporter<'a> {
    source: &'a dyn RecordSource,
    evaluator: Option<&'a dyn ExpressionEvaluator>,
}

impl<'a> RecordExporter<'a> {
    pub fn new(source: &'a dyn RecordSource, evaluator: Option<&'a dyn ExpressionEvaluator>) -> Self {
        Self { source, evaluator }
    }

    /// 导出 Profile 对应实体的全部记录
    ///
    /// # 返回
    /// 写出的记录条数
    #[instrument(skip(self, profile, expressions), fields(profile = %profile.name))]
    pub fn export_file(
        &self,
        profile: &Profile,
        expressions: &[TransformExpression],
        output: &Path,
    ) -> ImportResult<usize> {
        let ext = output
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        let format = FileFormat::from_extension(&ext).ok_or(ImportError::UnsupportedFormat(ext))?;

        let entity = profile.entity_type;
        let mut records = self.source.load_records(entity)?;
        ValuesTransformer::new(expressions, self.evaluator).transform_forward(&mut records)?;

        let mapper = FieldMapper::from_profile(profile);
        let headers = mapper.export_headers(&records);
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| mapper.record_to_row(r, &headers))
            .collect();

        match format {
            FileFormat::Csv => write_csv(output, &headers, &rows)?,
            FileFormat::Xml => {
                let adapter = iteration_node_name(&profile.tree).unwrap_or_else(|| entity.as_str().to_string());
                write_xml(output, &adapter, entity.row_element(), &headers, &rows)?
            }
        }

        info!(count = rows.len(), output = %output.display(), "导出完成");
        Ok(rows.len())
    }
}
