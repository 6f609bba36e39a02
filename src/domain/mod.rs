// ==========================================
// 商城数据导入导出 - 领域模型层
// ==========================================
// 职责: 记录、Profile、实体类型等领域对象
// 红线: 不含数据访问逻辑
// ==========================================

pub mod import_batch;
pub mod profile;
pub mod record;
pub mod types;

// 重导出核心类型
pub use import_batch::ImportSummary;
pub use profile::{
    field_mappings, iteration_node_name, walk_nodes, FieldMapping, NewProfile, Profile,
    ProfileData, TransformExpression,
};
pub use record::{FieldValue, Record, NULL_SENTINEL};
pub use types::{EntityType, FieldKind, FileFormat, UnknownEntityType};
