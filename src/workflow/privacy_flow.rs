//! 单条视频的隐私修改流程 - 流程层
//!
//! 核心职责：定义"一条视频"的完整处理流程，严格顺序推进，
//! 不回退不重试：
//!
//! 导航 → 设置菜单 → 隐私弹窗 → 展开可见范围下拉框
//! → 选中 "Only you" → 点击 Done 确认
//!
//! 任何一步控件缺失，整条视频的流程就地放弃，结果落在
//! 返回值里而不是异常控制流里

use tokio::time::sleep;
use tracing::info;

use crate::browser::driver::{UiSession, WaitUntil};
use crate::config::Config;
use crate::error::AppResult;
use crate::workflow::video_ctx::VideoCtx;

/// 流程里用到的页面控件
pub mod selectors {
    /// 视频页的设置按钮
    pub const SETTINGS_BUTTON: &str = r#"[data-e2e="video-setting"]"#;
    /// 设置菜单里的隐私入口
    pub const PRIVACY_MENU_ITEM: &str = "text=Privacy settings";
    /// 隐私弹窗标题
    pub const PRIVACY_MODAL: &str = "text=Who can watch this video";
    /// 可见范围下拉框的展开图标
    pub const DROPDOWN_TRIGGER: &str = "text=Who can watch this video >> .. >> svg";
    /// 目标选项
    pub const ONLY_ME_OPTION: &str = "text=Only you";
    /// 确认按钮
    pub const DONE_BUTTON: &str = "text=Done";
}

/// 单条视频的处理结果
///
/// 编排层只对这个值做分支，所有结果路径都可以被穷举测试。
/// Failed 时远端状态不确定（流程可能执行了一半），所以
/// 失败的视频绝不能写入账本
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 终点确认步骤已观察到
    Success,
    /// 某一步控件缺失，整条放弃
    Failed { reason: String },
}

/// 隐私修改流程
///
/// - 编排完整的单条流程，决定每一步等什么、点什么
/// - 不持有任何资源，只依赖注入的会话能力
/// - 不认识账本和统计
pub struct PrivacyFlow<'a> {
    config: &'a Config,
}

impl<'a> PrivacyFlow<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// 处理一条视频，所有步骤级错误都折叠进返回值
    pub async fn run(&self, session: &dyn UiSession, ctx: &VideoCtx) -> ProcessResult {
        match self.execute(session, ctx).await {
            Ok(()) => ProcessResult::Success,
            Err(e) => ProcessResult::Failed {
                reason: e.to_string(),
            },
        }
    }

    async fn execute(&self, session: &dyn UiSession, ctx: &VideoCtx) -> AppResult<()> {
        let timeouts = &self.config.timeouts;
        let delays = &self.config.delays;

        // 1. 导航到视频页
        let page = session
            .open(&ctx.url, WaitUntil::DomContentLoaded, timeouts.navigation)
            .await?;
        sleep(delays.navigation.sample()).await;

        // 2. 悬停设置按钮，展开菜单
        page.wait_for_match(selectors::SETTINGS_BUTTON, Some(timeouts.settings_button))
            .await?;
        page.hover(selectors::SETTINGS_BUTTON, timeouts.settings_button)
            .await?;
        sleep(delays.hover).await;

        // 3. 进入隐私设置弹窗
        page.click(selectors::PRIVACY_MENU_ITEM, timeouts.privacy_menu)
            .await?;
        sleep(delays.modal_open.sample()).await;
        page.wait_for_match(selectors::PRIVACY_MODAL, Some(timeouts.privacy_modal))
            .await?;

        // 4. 展开可见范围下拉框
        // 这个控件有状态，只定位一次、只点一次，重复展开会把它收回去
        page.click(selectors::DROPDOWN_TRIGGER, timeouts.dropdown_trigger)
            .await?;
        sleep(delays.dropdown_click).await;

        // 5. 选中 "Only you"
        page.wait_for_match(selectors::ONLY_ME_OPTION, Some(timeouts.option_appear))
            .await?;
        page.click(selectors::ONLY_ME_OPTION, timeouts.confirm_click)
            .await?;
        info!("{}    ✓ 已选中 \"Only you\"", ctx);
        sleep(delays.option_select.sample()).await;

        // 6. 点击 Done 确认
        page.wait_for_match(selectors::DONE_BUTTON, Some(timeouts.done_button))
            .await?;
        page.click(selectors::DONE_BUTTON, timeouts.confirm_click)
            .await?;
        info!("{}    ✓ 已点击 Done", ctx);

        // 留一小段时间观察界面落定
        sleep(delays.verification).await;

        Ok(())
    }
}
