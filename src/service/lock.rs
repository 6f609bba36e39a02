// ==========================================
// 商城数据导入导出 - 自动导入锁文件
// ==========================================
// 锁文件: <drop_dir>/__running，内容为到期的 Unix 时间戳（十进制）
// 获取: create-if-absent 原子创建
// 续期: 每处理一个文件前重写到期时间
// 释放: Guard 析构时删除
// ==========================================

use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const LOCK_FILE_NAME: &str = "__running";

/// 锁文件当前状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Free,
    Held { expires_at: i64 },
    Expired { expires_at: i64 },
}

/// 读取锁文件中的到期时间
///
/// 内容无法解析时按 0 处理（视为已过期）
pub fn read_expiry(path: &Path) -> io::Result<Option<i64>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content.trim().parse::<i64>().unwrap_or(0))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn inspect(path: &Path) -> io::Result<LockState> {
    let now = Utc::now().timestamp();
    Ok(match read_expiry(path)? {
        None => LockState::Free,
        Some(expires_at) if expires_at > now => LockState::Held { expires_at },
        Some(expires_at) => LockState::Expired { expires_at },
    })
}

fn expiry_after(ttl: Duration) -> i64 {
    Utc::now().timestamp() + ttl.as_secs() as i64
}

// ==========================================
// LockGuard - 持有期间锁文件存在
// ==========================================
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
    ttl: Duration,
}

impl LockGuard {
    /// 原子创建锁文件
    ///
    /// # 返回
    /// - Ok(None): 锁文件已存在（其他进程抢先）
    pub fn acquire(path: impl Into<PathBuf>, ttl: Duration) -> io::Result<Option<Self>> {
        let path = path.into();
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(None),
            Err(e) => return Err(e),
        };
        let expires_at = expiry_after(ttl);
        file.write_all(expires_at.to_string().as_bytes())?;
        debug!(lock = %path.display(), expires_at, "已获取导入锁");
        Ok(Some(Self { path, ttl }))
    }

    /// 续期（心跳）
    pub fn renew(&self) -> io::Result<i64> {
        let expires_at = expiry_after(self.ttl);
        fs::write(&self.path, expires_at.to_string())?;
        debug!(lock = %self.path.display(), expires_at, "导入锁已续期");
        Ok(expires_at)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(lock = %self.path.display(), "导入锁已释放"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(lock = %self.path.display(), error = %e, "导入锁释放失败"),
        }
    }
}
