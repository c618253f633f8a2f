//! UI 驱动抽象 - 基础设施层
//!
//! 核心算法只依赖这组能力接口，不依赖具体引擎，
//! 测试时可以换成确定性的内存假驱动

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::AppResult;
use crate::models::CookieRecord;

/// 打开页面时等待到哪个加载阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitUntil {
    DomContentLoaded,
    Load,
}

/// 浏览器会话身份
#[derive(Clone, Debug)]
pub struct SessionIdentity {
    pub user_agent: String,
    /// (宽, 高)
    pub viewport: (u32, u32),
    pub locale: String,
    pub timezone: String,
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            viewport: (1280, 720),
            locale: "en-US".to_string(),
            timezone: "America/New_York".to_string(),
        }
    }
}

/// 驱动入口：按给定身份启动一个浏览器会话
#[async_trait]
pub trait UiDriver: Send + Sync {
    async fn launch(&self, identity: &SessionIdentity) -> AppResult<Box<dyn UiSession>>;
}

/// 浏览器会话
///
/// 整个程序同一时刻只持有一个会话、一个页面，
/// 所有 UI 操作严格串行
#[async_trait]
pub trait UiSession: Send + Sync {
    /// 导航到 url 并返回页面句柄
    async fn open(
        &self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> AppResult<Box<dyn UiPage>>;

    /// 注入登录 Cookie
    async fn set_cookies(&self, cookies: &[CookieRecord]) -> AppResult<()>;

    /// 注册在每次导航前执行的脚本（必须在 open 之前调用才有意义）
    async fn inject_startup_script(&self, script: &str) -> AppResult<()>;

    /// 释放会话，所有退出路径都必须调用
    async fn close(&self) -> AppResult<()>;
}

/// 页面操作能力
///
/// 选择器支持三种形式：CSS 选择器、`text=精确文本`、
/// `text=精确文本 >> .. >> svg`（文本元素父级中的 svg 图标）
#[async_trait]
pub trait UiPage: Send + Sync {
    /// 等待选择器命中；`None` 表示无限期等待
    async fn wait_for_match(&self, selector: &str, timeout: Option<Duration>) -> AppResult<()>;

    /// 悬停到目标控件
    async fn hover(&self, selector: &str, timeout: Duration) -> AppResult<()>;

    /// 定位一次并点击一次目标控件
    async fn click(&self, selector: &str, timeout: Duration) -> AppResult<()>;

    /// 在页面中执行 JS 并返回 JSON 结果
    async fn evaluate_in_page(&self, script: &str) -> AppResult<JsonValue>;

    /// 滚动到页面底部
    async fn scroll_to_bottom(&self) -> AppResult<()>;

    /// 等待网络静默
    async fn wait_for_idle(&self, timeout: Duration) -> AppResult<()>;
}
