//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责两阶段流程的调度和资源管理，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量处理器
//! - 管理应用生命周期（前置校验、两个阶段、释放会话）
//! - 持有驱动和登录 Cookie
//! - 写收集结果文件，加载账本
//! - 输出全局统计信息
//!
//! ### `queue_processor` - 队列处理器
//! - 遍历收集到的视频列表（Vec<String>）
//! - 账本过滤、失败隔离、成功即落盘
//! - 每条之间随机冷却
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (两个阶段 + 资源)
//!     ↓
//! queue_processor (处理 Vec<String>)
//!     ↓
//! workflow::PrivacyFlow (处理单条视频)
//!     ↓
//! collector / services (能力层：收集 / 账本)
//!     ↓
//! browser (基础设施：UiDriver)
//! ```

pub mod batch_processor;
pub mod queue_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use queue_processor::process_queue;
