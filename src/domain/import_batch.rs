// ==========================================
// 商城数据导入导出 - 导入批次结果
// ==========================================

use crate::domain::types::EntityType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ==========================================
// ImportSummary - 单文件导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,          // 导入批次 ID（日志追踪）
    pub adapter: EntityType,       // 实体类型
    pub position: usize,           // 已处理记录数
    pub count: usize,              // 文件记录总数
    pub deferred: usize,           // 延后处理的记录数
    pub tmp_file: Option<PathBuf>, // 延后记录写出的临时 CSV
    pub elapsed_ms: u128,
}

impl ImportSummary {
    /// 是否已处理完全部记录
    pub fn is_complete(&self) -> bool {
        self.position >= self.count
    }
}
