//! # Video Privater
//!
//! 一个把自己主页视频批量设为"仅自己可见"的自动化工具
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Browser）
//! - `browser/` - UI 驱动能力接口与 Chromium 实现
//! - `ChromiumSession` - 唯一的页面 owner，所有交互走注入 JS
//!
//! ### ② 业务能力层（Services / Collector）
//! - `services/ProgressStore` - 完成账本，成功即同步落盘
//! - `collector/FeedCollector` - 感知停滞的增量滚动收集
//! - `models/` - Cookie 记录、统计、加载器
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/VideoCtx` - 上下文封装（url + 列表位置）
//! - `workflow/PrivacyFlow` - 单条视频的六步隐私修改流程
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 两阶段编排，管理会话资源
//! - `orchestrator/queue_processor` - 账本过滤的串行队列处理
//!
//! ## 可靠性
//!
//! - 收集循环三种终止条件：达到目标 / 连续停滞 / 迭代上限
//! - 每条成功立即重写账本快照，重复运行自动跳过已完成的
//! - 单条失败只记一笔，绝不写入账本，也不影响后续视频

pub mod browser;
pub mod collector;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod workflow;

// 重新导出常用类型
pub use browser::{ChromiumDriver, SessionIdentity, UiDriver, UiPage, UiSession, WaitUntil};
pub use collector::{DiscoverySet, FeedCollector};
pub use config::{CollectorConfig, Config, DelayRange, Delays, StepTimeouts};
pub use error::{AppError, AppResult};
pub use models::{load_cookie_file, CookieRecord, RunTally};
pub use orchestrator::App;
pub use services::ProgressStore;
pub use workflow::{PrivacyFlow, ProcessResult, VideoCtx};
