//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责两个阶段的编排和资源管理。
//!
//! ## 核心功能
//!
//! 1. **前置校验**：加载 Cookie 文件，缺失立即终止，不产生任何阶段副作用
//! 2. **阶段 1**：启动会话 → 收集主页视频链接 → 覆盖写收集结果文件
//! 3. **阶段 2**：启动会话 → 注入反检测脚本和登录 Cookie → 逐条修改隐私
//! 4. **资源管理**：会话在每条退出路径上都被释放，包括出错路径
//! 5. **全局统计**：输出最终汇总
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单条视频的细节，向下委托 queue_processor
//! - **资源所有者**：会话只在本模块的作用域内存活
//! - **显式依赖**：驱动和配置都从外面注入，便于用假驱动测试

use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::browser::driver::{UiDriver, UiSession, WaitUntil};
use crate::collector::FeedCollector;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_cookie_file, CookieRecord, RunTally};
use crate::orchestrator::queue_processor;
use crate::services::ProgressStore;

/// 每次导航前执行的反检测脚本
const STEALTH_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => false });";

/// 应用主结构
pub struct App {
    config: Config,
    driver: Box<dyn UiDriver>,
    cookies: Vec<CookieRecord>,
}

impl App {
    /// 初始化应用
    ///
    /// Cookie 文件在这里先行校验：缺失或损坏直接失败，
    /// 此时还没有打开过任何页面
    pub async fn initialize(config: Config, driver: Box<dyn UiDriver>) -> Result<Self> {
        let cookies = load_cookie_file(&config.cookie_file)?;

        Ok(Self {
            config,
            driver,
            cookies,
        })
    }

    /// 运行完整的两阶段流程
    pub async fn run(&mut self, username: &str, limit: usize) -> Result<RunTally> {
        log_phase_banner("📱 阶段 1: 收集视频");

        let links = self.collect_phase(username, limit).await?;
        if links.is_empty() {
            anyhow::bail!("没有收集到任何视频");
        }
        self.save_collected(&links)?;

        let mut store = ProgressStore::load(&self.config.progress_file)?;
        info!("📒 账本中已有 {} 条完成记录", store.len());

        log_phase_banner("🔒 阶段 2: 修改隐私设置");

        let tally = self.privacy_phase(&links, &mut store).await?;

        print_final_tally(&tally);
        Ok(tally)
    }

    /// 阶段 1：收集主页视频链接
    async fn collect_phase(&self, username: &str, limit: usize) -> Result<Vec<String>> {
        info!("🔍 开始收集 @{} 的视频...", username);
        info!("🎯 目标数量: {}", limit);

        let session = self.driver.launch(&self.config.identity).await?;
        let result = self.collect_with_session(session.as_ref(), username, limit).await;

        // 会话无论成败都要释放
        let closed = session.close().await;
        let links = result?;
        closed?;

        Ok(links)
    }

    async fn collect_with_session(
        &self,
        session: &dyn UiSession,
        username: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        let url = self.config.profile_url(username);
        let page = session
            .open(&url, WaitUntil::DomContentLoaded, self.config.timeouts.navigation)
            .await?;

        let collector = FeedCollector::new(&self.config.collector);
        let links = collector.collect(page.as_ref(), limit).await?;

        info!("✅ 共收集 {} 条链接（目标 {}）", links.len(), limit);
        Ok(links)
    }

    /// 覆盖写收集结果文件
    fn save_collected(&self, links: &[String]) -> Result<()> {
        let json = serde_json::to_string_pretty(links)?;
        fs::write(&self.config.collected_file, json).with_context(|| {
            format!("无法写入 {}", self.config.collected_file.display())
        })?;

        info!(
            "✅ 已保存 {} 条链接到 {}",
            links.len(),
            self.config.collected_file.display()
        );
        Ok(())
    }

    /// 阶段 2：逐条修改隐私设置
    async fn privacy_phase(
        &self,
        links: &[String],
        store: &mut ProgressStore,
    ) -> Result<RunTally> {
        let session = self.driver.launch(&self.config.identity).await?;
        let result = self.privacy_with_session(session.as_ref(), links, store).await;

        let closed = session.close().await;
        let tally = result?;
        closed?;

        Ok(tally)
    }

    async fn privacy_with_session(
        &self,
        session: &dyn UiSession,
        links: &[String],
        store: &mut ProgressStore,
    ) -> Result<RunTally> {
        self.prepare_session(session).await?;
        queue_processor::process_queue(session, store, links, &self.config).await
    }

    /// 登录态注入：反检测脚本必须先于任何导航注册
    async fn prepare_session(&self, session: &dyn UiSession) -> AppResult<()> {
        session.inject_startup_script(STEALTH_SCRIPT).await?;
        session.set_cookies(&self.cookies).await?;
        info!("🔐 登录会话已注入 ({} 条 Cookie)", self.cookies.len());
        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn log_phase_banner(title: &str) {
    info!("\n{}", "=".repeat(50));
    info!("{}", title);
    info!("{}", "=".repeat(50));
}

fn print_final_tally(tally: &RunTally) {
    info!("\n{}", "=".repeat(50));
    info!("📊 处理结果汇总:");
    info!("   ✅ 成功: {}", tally.success);
    info!("   ⏭️  跳过(已完成): {}", tally.skipped);
    info!("   ❌ 失败: {}", tally.failed);
    info!("   📝 列表总数: {}", tally.total);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(50));
}
