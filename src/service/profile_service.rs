// ==========================================
// 商城数据导入导出 - Profile 服务
// ==========================================
// 职责: Profile 的导入（JSON 上传）、导出、查询
// 约束: 上传的临时文件在任何返回路径上都被删除
// ==========================================

use crate::domain::{EntityType, NewProfile, Profile, ProfileData, TransformExpression};
use crate::importer::default_profiles::{new_default_profile, new_hidden_profile, DEFAULT_PROFILES};
use crate::repository::{ProfileRepository, RepositoryError};
use crate::service::error::{ServiceError, ServiceResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

// ==========================================
// UploadedFile - 上传文件（临时路径 + 客户端原始文件名）
// ==========================================
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub original_name: String,
}

impl UploadedFile {
    pub fn new(path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
        }
    }

    /// 原始文件名的扩展名（小写）
    pub fn original_extension(&self) -> String {
        Path::new(&self.original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}

/// 析构时删除临时文件
struct TempFileGuard<'a> {
    path: &'a Path,
}

impl Drop for TempFileGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "临时上传文件删除失败");
            }
        }
    }
}

/// JSON 值是否为空（null / "" / 0 / false / 空数组 / 空对象）
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty() || s == "0",
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// 解析上传内容为待写入的 Profile
fn parse_profile_json(content: &str) -> ServiceResult<NewProfile> {
    let data: Value = serde_json::from_str(content).map_err(|e| ServiceError::schema(e.to_string()))?;

    for key in ["name", "type", "tree"] {
        if is_blank(data.get(key)) {
            return Err(ServiceError::schema(format!("缺少 {}", key)));
        }
    }

    let name = match data.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => return Err(ServiceError::schema("缺少 name")),
    };
    let entity_type = data
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ServiceError::schema("type 必须是字符串"))?
        .parse::<EntityType>()
        .map_err(|e| ServiceError::schema(e.to_string()))?;
    let tree = data.get("tree").cloned().unwrap_or(Value::Null);

    Ok(NewProfile {
        name,
        entity_type,
        tree,
        hidden: false,
    })
}

// ==========================================
// ProfileService
// ==========================================
pub struct ProfileService {
    repo: ProfileRepository,
}

impl ProfileService {
    pub fn new(repo: ProfileRepository) -> Self {
        Self { repo }
    }

    /// 导入上传的 Profile JSON
    ///
    /// # 错误
    /// - Format: 原始扩展名不是 json
    /// - EmptyContent: 内容为空
    /// - Schema: JSON 无效、缺少 name/type/tree 或 type 不受支持
    /// - Duplicate: 名称已存在
    /// - ProfileImport: 其他持久化失败
    #[instrument(skip(self, uploaded), fields(original_name = %uploaded.original_name))]
    pub fn import_profile(&self, uploaded: &UploadedFile) -> ServiceResult<Profile> {
        let _cleanup = TempFileGuard { path: &uploaded.path };

        if uploaded.original_extension() != "json" {
            return Err(ServiceError::format());
        }

        let content = fs::read_to_string(&uploaded.path)?;
        if content.trim().is_empty() {
            return Err(ServiceError::empty_content());
        }

        let new_profile = parse_profile_json(&content)?;
        let profile = self.repo.create(&new_profile).map_err(|e| match e {
            RepositoryError::UniqueConstraintViolation(_) => ServiceError::duplicate(&new_profile.name),
            other => ServiceError::profile_import(other.to_string()),
        })?;

        info!(profile_id = profile.id, name = %profile.name, "Profile 导入成功");
        Ok(profile)
    }

    /// 导出 Profile
    pub fn export_profile(&self, profile_id: i64) -> ServiceResult<ProfileData> {
        self.repo
            .find_by_id(profile_id)?
            .map(ProfileData::from)
            .ok_or_else(|| ServiceError::not_found(profile_id))
    }

    /// 可见 Profile 列表
    pub fn list_profiles(&self) -> ServiceResult<Vec<Profile>> {
        Ok(self.repo.list(false)?)
    }

    pub fn find_by_name(&self, name: &str) -> ServiceResult<Option<Profile>> {
        Ok(self.repo.find_by_name(name)?)
    }

    /// 按文件名查找 Profile
    ///
    /// 文件名按 `.` 拆分，各段小写后依次尝试
    pub fn find_for_file(&self, file_name: &str) -> ServiceResult<Option<Profile>> {
        for part in file_name.split('.') {
            let candidate = part.to_lowercase();
            if candidate.is_empty() {
                continue;
            }
            if let Some(profile) = self.repo.find_by_name(&candidate)? {
                return Ok(Some(profile));
            }
        }
        Ok(None)
    }

    /// 加载实体类型的隐藏 Profile（不存在时由默认树创建）
    pub fn load_hidden_profile(&self, entity_type: EntityType) -> ServiceResult<Profile> {
        if let Some(profile) = self.repo.find_hidden(entity_type)? {
            return Ok(profile);
        }
        let profile = self.repo.create(&new_hidden_profile(entity_type))?;
        info!(entity = %entity_type, name = %profile.name, "已创建隐藏 Profile");
        Ok(profile)
    }

    /// 为 Profile 添加转换表达式
    pub fn add_expression(&self, profile_id: i64, expression: &TransformExpression) -> ServiceResult<i64> {
        if self.repo.find_by_id(profile_id)?.is_none() {
            return Err(ServiceError::not_found(profile_id));
        }
        Ok(self.repo.add_expression(profile_id, expression)?)
    }

    pub fn list_expressions(&self, profile_id: i64) -> ServiceResult<Vec<TransformExpression>> {
        Ok(self.repo.list_expressions(profile_id)?)
    }

    /// 安装内置默认 Profile（已存在的跳过）
    ///
    /// # 返回
    /// 本次新建的 Profile
    pub fn install_default_profiles(&self) -> ServiceResult<Vec<Profile>> {
        let mut created = Vec::new();
        for meta in DEFAULT_PROFILES.iter() {
            if self.repo.find_by_name(meta.name)?.is_some() {
                continue;
            }
            created.push(self.repo.create(&new_default_profile(meta.entity_type))?);
        }
        info!(count = created.len(), "默认 Profile 安装完成");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_profile_json() {
        let profile = parse_profile_json(
            r#"{"name":"my_stock","type":"articlesInStock","tree":{"id":"root","name":"Root","type":"node"}}"#,
        )
        .unwrap();
        assert_eq!(profile.name, "my_stock");
        assert_eq!(profile.entity_type, EntityType::ArticlesInStock);
        assert_eq!(profile.tree["id"], json!("root"));
    }

    #[test]
    fn test_parse_profile_json_rejects_missing_or_empty() {
        for content in [
            r#"{"name":"x","type":"customers"}"#,
            r#"{"name":"","type":"customers","tree":{"a":1}}"#,
            r#"{"name":"x","type":"customers","tree":{}}"#,
            r#"{"name":"x","type":"unknownThing","tree":{"a":1}}"#,
            "not json",
        ] {
            assert!(
                matches!(parse_profile_json(content), Err(ServiceError::Schema(_))),
                "应当拒绝: {}",
                content
            );
        }
    }

    #[test]
    fn test_original_extension_is_case_insensitive() {
        assert_eq!(UploadedFile::new("/tmp/x", "Profile.JSON").original_extension(), "json");
        assert_eq!(UploadedFile::new("/tmp/x", "profile").original_extension(), "");
    }
}
