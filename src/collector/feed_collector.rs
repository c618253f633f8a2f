//! 主页视频收集器
//!
//! 通过有界、感知停滞的增量滚动，从持续加载的主页列表中
//! 枚举视频链接。终止条件三选一：达到目标数量、连续停滞、
//! 迭代硬上限

use regex::Regex;
use tokio::time::sleep;
use tracing::info;

use crate::browser::driver::UiPage;
use crate::collector::ordered_set::DiscoverySet;
use crate::config::CollectorConfig;
use crate::error::AppResult;

/// 视频和图文两种帖子的链接锚点
pub const POST_LINK_SELECTOR: &str = r#"a[href*="/video/"], a[href*="/photo/"]"#;

/// 读取当前页面上全部候选链接（页面自身已做一层去重）
const COLLECT_LINKS_JS: &str = r#"
Array.from(new Set(
    Array.from(document.querySelectorAll('a[href*="/video/"], a[href*="/photo/"]'))
        .map(a => a.href)
))
"#;

/// 合法帖子地址的形态
const CANONICAL_POST_PATTERN: &str = r"/(video|photo)/\d+";

/// 主页视频收集器
///
/// 职责：
/// - 只做"枚举链接"这一件事
/// - 不认识账本，不认识隐私流程
/// - 输出有界、去重、最早发现在前
pub struct FeedCollector<'a> {
    config: &'a CollectorConfig,
}

impl<'a> FeedCollector<'a> {
    pub fn new(config: &'a CollectorConfig) -> Self {
        Self { config }
    }

    /// 收集至多 target_count 条视频链接
    ///
    /// 初始等待是无限期的：空主页和"尚未加载完"在页面上无法
    /// 区分，这是一个已知限制
    pub async fn collect(
        &self,
        page: &dyn UiPage,
        target_count: usize,
    ) -> AppResult<Vec<String>> {
        page.wait_for_match(POST_LINK_SELECTOR, None).await?;

        let canonical = Regex::new(CANONICAL_POST_PATTERN)?;
        let mut found = DiscoverySet::new();
        let mut stagnant_scrolls = 0usize;

        info!("🔄 滚动页面加载更多视频和图文...");

        for iteration in 0..self.config.max_scroll_iterations {
            let raw: Vec<String> =
                serde_json::from_value(page.evaluate_in_page(COLLECT_LINKS_JS).await?)?;

            let new_found = found.merge(
                raw.into_iter().filter(|link| canonical.is_match(link)),
            );

            info!(
                "📊 第 {} 次滚动: 新增 {} 条 (共 {}/{})",
                iteration + 1,
                new_found,
                found.len(),
                target_count
            );

            if found.len() >= target_count {
                info!("✅ 已达到目标数量: {}", found.len());
                break;
            }

            if new_found == 0 {
                stagnant_scrolls += 1;
                info!(
                    "⏳ 暂无新内容 ({}/{})",
                    stagnant_scrolls, self.config.max_stagnant_scrolls
                );

                if stagnant_scrolls >= self.config.max_stagnant_scrolls {
                    info!("⛔ 不再加载新帖子 — 停止于 {} 条", found.len());
                    break;
                }

                // 内容可能只是慢，不是没了：多等一会再读
                sleep(self.config.stagnant_wait).await;
                continue;
            }

            stagnant_scrolls = 0;
            page.scroll_to_bottom().await?;

            // 网络静默是就绪信号，但慢网络不能卡死算法：
            // 超时就退回固定延迟继续
            if page.wait_for_idle(self.config.idle_timeout).await.is_err() {
                sleep(self.config.idle_fallback).await;
            }
        }

        Ok(found.into_oldest_first(target_count))
    }
}
