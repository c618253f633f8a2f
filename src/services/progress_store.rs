//! 完成账本服务 - 业务能力层
//!
//! 只负责"记住哪些视频已经改完"这一能力，不关心流程。
//! 每次成功后同步重写完整快照，崩溃丢失最多只有在途的那一条

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{AppError, AppResult, FileError};

/// 完成账本
///
/// 磁盘形态是 JSON 字符串数组，按完成顺序排列。
/// 加载一次，之后只增不减
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    done: HashSet<String>,
    order: Vec<String>,
}

impl ProgressStore {
    /// 从磁盘加载账本
    ///
    /// 文件不存在视为空账本；文件存在但解析失败是致命错误，
    /// 宁可终止也不能在可能覆盖旧进度的状态下继续
    pub fn load(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        if !path.exists() {
            debug!("账本 {} 不存在，从空账本开始", path.display());
            return Ok(Self {
                path,
                done: HashSet::new(),
                order: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        let order: Vec<String> = serde_json::from_str(&content).map_err(|e| {
            AppError::File(FileError::JsonParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;

        let done = order.iter().cloned().collect();

        Ok(Self { path, done, order })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.done.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 标记一条完成，并在返回前同步落盘
    ///
    /// 落盘先于返回：调用方看到 Ok 时快照必然已包含这条记录
    pub fn mark_done(&mut self, id: &str) -> AppResult<()> {
        if !self.done.insert(id.to_string()) {
            return Ok(());
        }
        self.order.push(id.to_string());
        self.flush()
    }

    /// 整体重写快照，从不暴露追加式的中间状态
    ///
    /// 先写临时文件再原子换名：中途崩溃时磁盘上要么是旧快照
    /// 要么是新快照，不会出现写了一半的文件
    fn flush(&self) -> AppResult<()> {
        let json = serde_json::to_string_pretty(&self.order)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, json)
            .map_err(|e| AppError::file_write_failed(tmp_path.display().to_string(), e))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| AppError::file_write_failed(self.path.display().to_string(), e))?;

        Ok(())
    }
}
