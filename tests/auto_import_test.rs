// ==========================================
// AutoImportService 集成测试
// ==========================================
// 测试目标: 锁文件、候选文件扫描、失败归档、后续子导入
// ==========================================

mod test_helpers;

use chrono::Utc;
use shop_import_export::app::AppState;
use shop_import_export::config::AutoImportConfig;
use shop_import_export::domain::{EntityType, FieldValue};
use shop_import_export::i18n;
use shop_import_export::service::{AutoImportOutcome, LOCK_FILE_NAME};
use std::fs;
use std::path::Path;
use test_helpers::{create_import_dirs, create_test_state, write_file};

fn setup() -> (tempfile::NamedTempFile, AppState) {
    i18n::set_locale("en");
    let (db, state) = create_test_state().expect("Failed to create state");
    state.profile_service.install_default_profiles().unwrap();
    (db, state)
}

fn config(drop_dir: &Path, work_dir: &Path) -> AutoImportConfig {
    AutoImportConfig::new(drop_dir, work_dir)
}

#[test]
fn test_unexpired_lock_blocks_run() {
    let (_db, state) = setup();
    let (_root, drop_dir, work_dir) = create_import_dirs().unwrap();
    let lock = write_file(&drop_dir, LOCK_FILE_NAME, &(Utc::now().timestamp() + 600).to_string());
    let input = write_file(&drop_dir, "default_article_in_stock.csv", "orderNumber;inStock\nSW1;5\n");

    let report = state.auto_import_service(config(&drop_dir, &work_dir), None).run().unwrap();

    assert_eq!(report.outcome, AutoImportOutcome::InProgress);
    assert_eq!(report.messages, vec!["There is already an import in progress."]);
    assert!(lock.exists(), "他人的锁不应被删除");
    assert!(input.exists());
    assert_eq!(state.record_store.count(EntityType::ArticlesInStock).unwrap(), 0);
}

#[test]
fn test_expired_lock_is_taken_over() {
    let (_db, state) = setup();
    let (_root, drop_dir, work_dir) = create_import_dirs().unwrap();
    let lock = write_file(&drop_dir, LOCK_FILE_NAME, &(Utc::now().timestamp() - 10).to_string());
    let input = write_file(
        &drop_dir,
        "default_article_in_stock.csv",
        "orderNumber;inStock\nSW1;5\nSW2;7\n",
    );

    let report = state.auto_import_service(config(&drop_dir, &work_dir), None).run().unwrap();

    assert_eq!(report.outcome, AutoImportOutcome::Completed);
    assert_eq!(report.messages, vec!["2 articlesInStock imported successfully"]);
    assert!(!input.exists(), "成功导入后删除源文件");
    assert!(!lock.exists(), "运行结束后释放锁");

    let record = state
        .record_store
        .find(EntityType::ArticlesInStock, "SW2")
        .unwrap()
        .unwrap();
    assert_eq!(record.get("inStock"), Some(&FieldValue::Int(7)));
    assert_eq!(record.get("supplier"), Some(&FieldValue::text("")));
}

#[test]
fn test_no_files() {
    let (_db, state) = setup();
    let (_root, drop_dir, work_dir) = create_import_dirs().unwrap();
    write_file(&drop_dir, ".htaccess", "deny from all");

    let report = state.auto_import_service(config(&drop_dir, &work_dir), None).run().unwrap();

    assert_eq!(report.outcome, AutoImportOutcome::NoFiles);
    assert_eq!(report.messages, vec!["No import files are found."]);
    assert!(!drop_dir.join(LOCK_FILE_NAME).exists());
}

#[test]
fn test_no_profile_stops_run() {
    let (_db, state) = setup();
    let (_root, drop_dir, work_dir) = create_import_dirs().unwrap();
    let unknown = write_file(&drop_dir, "unknown.csv", "orderNumber\nSW1\n");
    let later = write_file(&drop_dir, "zz.default_article_in_stock.csv", "orderNumber\nSW1\n");

    let report = state.auto_import_service(config(&drop_dir, &work_dir), None).run().unwrap();

    assert_eq!(report.outcome, AutoImportOutcome::NoProfile);
    assert_eq!(report.messages, vec!["No profile found unknown"]);
    assert!(unknown.exists());
    assert!(later.exists(), "后续文件不再处理");
    assert!(!drop_dir.join(LOCK_FILE_NAME).exists());
}

#[test]
fn test_failed_file_is_copied_to_broken_and_stops_run() {
    let (_db, state) = setup();
    let (_root, drop_dir, work_dir) = create_import_dirs().unwrap();
    // 缺少必填列 orderNumber
    let broken = write_file(&drop_dir, "1.default_article_in_stock.csv", "inStock\n5\n");
    let valid = write_file(&drop_dir, "2.default_article_in_stock.csv", "orderNumber;inStock\nSW1;5\n");

    let report = state.auto_import_service(config(&drop_dir, &work_dir), None).run().unwrap();

    assert_eq!(report.outcome, AutoImportOutcome::Failed);
    assert!(!report.is_success());
    assert_eq!(report.messages.len(), 1);
    assert!(report.messages[0].contains("1.default_article_in_stock.csv"));

    let archived = work_dir.join("broken-1.default_article_in_stock.csv");
    assert!(archived.exists());
    assert_eq!(fs::read_to_string(&archived).unwrap(), "inStock\n5\n");
    assert!(broken.exists(), "失败文件复制而非移动");
    assert!(valid.exists());
    assert!(!drop_dir.join(LOCK_FILE_NAME).exists());
    assert_eq!(state.record_store.count(EntityType::ArticlesInStock).unwrap(), 0);
}

#[test]
fn test_unsupported_extension_is_skipped() {
    let (_db, state) = setup();
    let (_root, drop_dir, work_dir) = create_import_dirs().unwrap();
    let notes = write_file(&drop_dir, "notes.txt", "hello");
    write_file(&drop_dir, "default_article_in_stock.csv", "orderNumber\nSW1\n");

    let report = state.auto_import_service(config(&drop_dir, &work_dir), None).run().unwrap();

    assert_eq!(report.outcome, AutoImportOutcome::Completed);
    assert_eq!(report.messages, vec!["1 articlesInStock imported successfully"]);
    assert!(notes.exists());
}

#[test]
fn test_deferred_variants_are_imported_with_hidden_profile() {
    let (_db, state) = setup();
    let (_root, drop_dir, work_dir) = create_import_dirs().unwrap();
    let file_name = "default_article_variants_minimal.csv";
    write_file(
        &drop_dir,
        file_name,
        "orderNumber;mainNumber;name;price\nSW1.1;SW1;Variant;10\nSW1;SW1;Main;12\n",
    );

    let report = state.auto_import_service(config(&drop_dir, &work_dir), None).run().unwrap();

    assert_eq!(report.outcome, AutoImportOutcome::Completed);
    assert_eq!(report.messages, vec!["2 articles imported successfully"]);
    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].deferred, 1);
    assert_eq!(report.summaries[1].adapter, EntityType::Articles);
    assert_eq!(report.summaries[1].position, 1);
    assert_eq!(report.summaries[1].deferred, 0);

    assert!(!work_dir.join(format!("{}-articles-tmp.csv", file_name)).exists());
    assert!(work_dir.join(format!("{}-articles-swag.csv", file_name)).exists());

    let variant = state.record_store.find(EntityType::Articles, "SW1.1").unwrap().unwrap();
    assert_eq!(variant.get("mainNumber"), Some(&FieldValue::text("SW1")));
    assert_eq!(variant.get("price"), Some(&FieldValue::Float(10.0)));
    assert_eq!(state.record_store.count(EntityType::Articles).unwrap(), 2);
}
