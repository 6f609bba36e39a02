// ==========================================
// 商城数据导入导出 - 命令行入口
// ==========================================
// 子命令:
// - auto-import: 扫描投放目录执行定时导入
// - profile import|export|list|install-defaults
// 二进制不内置表达式求值器，转换表达式只能通过库接口注入求值器后使用
// - export: 按 Profile 导出记录
// ==========================================

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shop_import_export::app::{get_default_db_path, AppState};
use shop_import_export::config::{AutoImportConfig, DEFAULT_BATCH_SIZE};
use shop_import_export::service::UploadedFile;
use shop_import_export::{i18n, logging};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shop-import-export")]
#[command(version, about = "商城数据导入导出工具")]
struct Cli {
    /// SQLite 数据库路径
    #[arg(long, global = true, env = "SHOP_IMPORT_DB_PATH")]
    db: Option<String>,

    /// 输出语言（en / zh-CN）
    #[arg(long, global = true, env = "SHOP_IMPORT_LOCALE", default_value = "en")]
    locale: String,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 扫描投放目录并导入其中的文件
    AutoImport {
        #[arg(long, env = "SHOP_IMPORT_DROP_DIR")]
        drop_dir: PathBuf,

        #[arg(long, env = "SHOP_IMPORT_WORK_DIR")]
        work_dir: PathBuf,

        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Profile 管理
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// 按 Profile 导出记录（格式由输出文件扩展名决定）
    Export {
        #[arg(long)]
        profile: String,

        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// 导入 Profile JSON 文件
    Import { file: PathBuf },

    /// 导出 Profile（不指定 --output 时打印到 stdout）
    Export {
        id: i64,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// 列出可见 Profile
    List,

    /// 安装内置默认 Profile
    InstallDefaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    i18n::set_locale(&cli.locale);

    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    tracing::info!(version = shop_import_export::VERSION, db_path = %db_path, "启动");
    let state = AppState::new(db_path.clone()).with_context(|| format!("无法打开数据库: {}", db_path))?;

    match cli.command {
        Command::AutoImport {
            drop_dir,
            work_dir,
            batch_size,
        } => {
            let config = AutoImportConfig::new(drop_dir, work_dir).with_batch_size(batch_size);
            let report = state.auto_import_service(config, None).run()?;
            for message in &report.messages {
                println!("{}", message);
            }
            if !report.is_success() {
                bail!("自动导入未完成: {:?}", report.outcome);
            }
        }
        Command::Profile { action } => run_profile(&state, action)?,
        Command::Export { profile, output } => {
            let profile = state
                .profile_service
                .find_by_name(&profile)?
                .with_context(|| format!("Profile 不存在: {}", profile))?;
            let expressions = state.profile_service.list_expressions(profile.id)?;
            let count = state.record_exporter(None).export_file(&profile, &expressions, &output)?;
            println!(
                "{}",
                i18n::t_with_args(
                    "export.done",
                    &[("count", &count.to_string()), ("path", &output.display().to_string())],
                )
            );
        }
    }

    Ok(())
}

fn run_profile(state: &AppState, action: ProfileAction) -> Result<()> {
    let service = &state.profile_service;
    match action {
        ProfileAction::Import { file } => {
            // 导入会删除上传文件，先复制为临时文件
            let original_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let temp = std::env::temp_dir().join(format!("profile-upload-{}", uuid::Uuid::new_v4()));
            fs::copy(&file, &temp).with_context(|| format!("无法读取文件: {}", file.display()))?;

            let profile = service.import_profile(&UploadedFile::new(temp, original_name))?;
            println!("{}", i18n::t_with_args("profile.imported", &[("name", &profile.name)]));
        }
        ProfileAction::Export { id, output } => {
            let data = service.export_profile(id)?;
            let json = serde_json::to_string_pretty(&data)?;
            match output {
                Some(path) => fs::write(&path, json).with_context(|| format!("无法写入: {}", path.display()))?,
                None => println!("{}", json),
            }
        }
        ProfileAction::List => {
            for profile in service.list_profiles()? {
                println!("{}\t{}\t{}", profile.id, profile.name, profile.entity_type);
            }
        }
        ProfileAction::InstallDefaults => {
            for profile in service.install_default_profiles()? {
                println!("{}\t{}\t{}", profile.id, profile.name, profile.entity_type);
            }
        }
    }
    Ok(())
}
