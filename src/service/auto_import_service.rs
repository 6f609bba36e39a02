// ==========================================
// 商城数据导入导出 - 定时自动导入
// ==========================================
// 流程:
// 1. 检查锁文件（未过期 → 退出；已过期 → 删除后继续）
// 2. 扫描投放目录（排除 .htaccess 与锁文件，按名称排序）
// 3. 获取锁，逐个文件: 续期 → 匹配 Profile → 导入 → 后续子导入 → 删除源文件
// 4. 任一文件失败: 复制为 broken-<file>，终止本次运行
// ==========================================

use crate::config::{AutoImportConfig, ShopConfigReader};
use crate::domain::{EntityType, FileFormat, ImportSummary, Profile};
use crate::i18n;
use crate::importer::{
    deferred_file_path, ExpressionEvaluator, NumberRangeIncrementer, RecordImporter, RecordSink,
};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::lock::{inspect, LockGuard, LockState, LOCK_FILE_NAME};
use crate::service::profile_service::ProfileService;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// 投放目录中不参与导入的文件
const IGNORED_FILES: [&str; 2] = [".htaccess", LOCK_FILE_NAME];

/// 需要后续子导入的实体类型（依赖未就绪的记录会写入临时 CSV）
const FOLLOW_UP_ENTITIES: [EntityType; 2] = [EntityType::Articles, EntityType::ArticlesImages];

/// 本次运行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoImportOutcome {
    InProgress, // 已有导入在运行
    NoFiles,    // 投放目录为空
    Completed,  // 全部文件导入成功
    NoProfile,  // 有文件找不到对应 Profile
    Failed,     // 有文件导入失败
}

#[derive(Debug, Clone)]
pub struct AutoImportReport {
    pub outcome: AutoImportOutcome,
    pub messages: Vec<String>,         // 控制台输出行
    pub summaries: Vec<ImportSummary>, // 已成功导入文件的汇总（含子导入）
}

impl AutoImportReport {
    fn new() -> Self {
        Self {
            outcome: AutoImportOutcome::Completed,
            messages: Vec::new(),
            summaries: Vec::new(),
        }
    }

    fn finish(mut self, outcome: AutoImportOutcome, message: String) -> Self {
        self.outcome = outcome;
        self.messages.push(message);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self.outcome,
            AutoImportOutcome::Completed | AutoImportOutcome::NoFiles | AutoImportOutcome::InProgress
        )
    }
}

/// 列出候选文件（排序后）
pub fn list_candidates(drop_directory: &Path) -> ServiceResult<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(drop_directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if IGNORED_FILES.contains(&name.as_str()) {
            continue;
        }
        files.push(name);
    }
    files.sort();
    Ok(files)
}

fn file_format(file_name: &str) -> Option<FileFormat> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(FileFormat::from_extension)
}

fn file_stem_lowercase(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

// ==========================================
// AutoImportService
// ==========================================
pub struct AutoImportService<'a> {
    config: AutoImportConfig,
    profiles: &'a ProfileService,
    shop_config: &'a dyn ShopConfigReader,
    numbers: &'a dyn NumberRangeIncrementer,
    sink: &'a dyn RecordSink,
    evaluator: Option<&'a dyn ExpressionEvaluator>,
}

impl<'a> AutoImportService<'a> {
    pub fn new(
        config: AutoImportConfig,
        profiles: &'a ProfileService,
        shop_config: &'a dyn ShopConfigReader,
        numbers: &'a dyn NumberRangeIncrementer,
        sink: &'a dyn RecordSink,
    ) -> Self {
        Self {
            config,
            profiles,
            shop_config,
            numbers,
            sink,
            evaluator: None,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Option<&'a dyn ExpressionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    fn lock_path(&self) -> PathBuf {
        self.config.drop_directory.join(LOCK_FILE_NAME)
    }

    /// 执行一次自动导入
    ///
    /// # 错误
    /// 仅目录/锁文件的 IO 失败返回 Err；单个文件的导入失败体现在报告中
    #[instrument(skip(self), fields(drop_dir = %self.config.drop_directory.display()))]
    pub fn run(&self) -> ServiceResult<AutoImportReport> {
        let report = AutoImportReport::new();
        let lock_path = self.lock_path();

        match inspect(&lock_path)? {
            LockState::Held { expires_at } => {
                info!(expires_at, "已有导入在运行，本次跳过");
                return Ok(report.finish(AutoImportOutcome::InProgress, in_progress_message()));
            }
            LockState::Expired { expires_at } => {
                warn!(expires_at, "锁文件已过期，接管");
                match fs::remove_file(&lock_path) {
                    Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
                    _ => {}
                }
            }
            LockState::Free => {}
        }

        let files = list_candidates(&self.config.drop_directory)?;
        if files.is_empty() {
            info!("投放目录中没有待导入文件");
            return Ok(report.finish(
                AutoImportOutcome::NoFiles,
                i18n::t_or("cronjob.no_files", "No import files are found."),
            ));
        }

        let guard = match LockGuard::acquire(&lock_path, self.config.lock_ttl)? {
            Some(guard) => guard,
            None => {
                info!("锁文件被其他进程抢先创建");
                return Ok(report.finish(AutoImportOutcome::InProgress, in_progress_message()));
            }
        };
        fs::create_dir_all(&self.config.work_directory)?;

        self.import_files(&files, &guard, report)
    }

    fn import_files(
        &self,
        files: &[String],
        guard: &LockGuard,
        mut report: AutoImportReport,
    ) -> ServiceResult<AutoImportReport> {
        for file_name in files {
            if file_format(file_name).is_none() {
                debug!(file = %file_name, "跳过不支持的文件类型");
                continue;
            }
            guard.renew()?;

            let profile = match self.profiles.find_for_file(file_name)? {
                Some(profile) => profile,
                None => {
                    let err = ServiceError::no_profile_for_file(&file_stem_lowercase(file_name));
                    warn!(file = %file_name, "找不到对应的 Profile");
                    return Ok(report.finish(AutoImportOutcome::NoProfile, err.to_string()));
                }
            };

            let input = self.config.drop_directory.join(file_name);
            match self.import_with_follow_ups(&profile, file_name, &input) {
                Ok(summaries) => {
                    if let Some(main) = summaries.first() {
                        report.messages.push(i18n::t_with_args(
                            "cronjob.imported",
                            &[
                                ("position", &main.position.to_string()),
                                ("adapter", main.adapter.as_str()),
                            ],
                        ));
                    }
                    report.summaries.extend(summaries);
                    fs::remove_file(&input)?;
                    info!(file = %file_name, "文件导入完成，已删除源文件");
                }
                Err(e) => {
                    error!(file = %file_name, error = %e, "文件导入失败，终止本次运行");
                    self.archive_broken(file_name, &input);
                    let message = i18n::t_with_args(
                        "cronjob.failed",
                        &[("file", file_name.as_str()), ("error", &e.to_string())],
                    );
                    return Ok(report.finish(AutoImportOutcome::Failed, message));
                }
            }
        }

        report.outcome = AutoImportOutcome::Completed;
        Ok(report)
    }

    /// 导入主文件，随后处理 articles / articlesImages 的延后记录
    fn import_with_follow_ups(
        &self,
        profile: &Profile,
        file_name: &str,
        input: &Path,
    ) -> ServiceResult<Vec<ImportSummary>> {
        let mut summaries = vec![self.import_one(profile, input)?];

        for entity in FOLLOW_UP_ENTITIES {
            let tmp_file = deferred_file_path(&self.config.work_directory, file_name, entity);
            if !tmp_file.exists() {
                continue;
            }
            let swag_file = self
                .config
                .work_directory
                .join(format!("{}-{}-swag.csv", file_name, entity.as_str()));
            fs::rename(&tmp_file, &swag_file)?;

            let hidden = self.profiles.load_hidden_profile(entity)?;
            info!(entity = %entity, file = %swag_file.display(), "开始后续子导入");
            summaries.push(self.import_one(&hidden, &swag_file)?);
        }

        Ok(summaries)
    }

    fn import_one(&self, profile: &Profile, path: &Path) -> ServiceResult<ImportSummary> {
        let expressions = self.profiles.list_expressions(profile.id)?;
        let importer = RecordImporter::new(
            self.shop_config,
            self.numbers,
            self.sink,
            self.config.work_directory.clone(),
        )
        .with_evaluator(self.evaluator)
        .with_batch_size(self.config.batch_size);

        Ok(importer.import_path(profile, &expressions, path)?)
    }

    /// 失败文件复制到 work 目录（不移动）
    fn archive_broken(&self, file_name: &str, input: &Path) {
        let broken = self.config.work_directory.join(format!("broken-{}", file_name));
        if let Err(e) = fs::copy(input, &broken) {
            warn!(file = %file_name, error = %e, "失败文件归档失败");
        }
    }
}

fn in_progress_message() -> String {
    i18n::t_or("cronjob.in_progress", "There is already an import in progress.")
}
