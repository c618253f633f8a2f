//! 运行结果统计

/// 单次运行的处理统计
///
/// 每次运行新建，只在内存中累加，从不落盘
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunTally {
    /// 本次成功修改的数量
    pub success: usize,
    /// 账本中已有、跳过的数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 待处理列表总数
    pub total: usize,
}

impl RunTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }
}
