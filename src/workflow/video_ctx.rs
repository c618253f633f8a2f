//! 视频处理上下文
//!
//! 封装"我正在处理列表里第几条的哪个视频"这一信息

use std::fmt::Display;

/// 视频处理上下文
#[derive(Debug, Clone)]
pub struct VideoCtx {
    /// 视频链接
    pub url: String,

    /// 在待处理列表中的位置（从 1 开始，仅用于日志显示）
    pub position: usize,

    /// 列表总数
    pub total: usize,
}

impl VideoCtx {
    pub fn new(url: String, position: usize, total: usize) -> Self {
        Self {
            url,
            position,
            total,
        }
    }
}

impl Display for VideoCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}]", self.position, self.total)
    }
}
