// ==========================================
// 商城数据导入导出 - 自动导入运行配置
// ==========================================
// 构造时一次性解析目录与参数，运行期间不再变更
// ==========================================

use std::path::PathBuf;
use std::time::Duration;

/// 锁文件默认有效期（30 分钟，每处理一个文件续期一次）
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(30 * 60);

/// 默认每批落库记录数
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct AutoImportConfig {
    pub drop_directory: PathBuf, // 待导入文件投放目录（锁文件也在此）
    pub work_directory: PathBuf, // 临时文件/失败文件归档目录
    pub lock_ttl: Duration,
    pub batch_size: usize,
}

impl AutoImportConfig {
    pub fn new(drop_directory: impl Into<PathBuf>, work_directory: impl Into<PathBuf>) -> Self {
        Self {
            drop_directory: drop_directory.into(),
            work_directory: work_directory.into(),
            lock_ttl: DEFAULT_LOCK_TTL,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_lock_ttl(mut self, lock_ttl: Duration) -> Self {
        self.lock_ttl = lock_ttl;
        self
    }
}
