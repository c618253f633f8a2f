//! 队列处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责按顺序处理收集到的视频列表：
//!
//! 1. **账本过滤**：已完成的视频计为跳过，绝不重复处理
//! 2. **流程调度**：逐条委托 PrivacyFlow，严格串行
//! 3. **先落盘再计数**：成功立即写账本，之后才累加统计
//! 4. **失败隔离**：单条失败只记一笔，不影响后续视频
//! 5. **节奏控制**：每处理一条（无论成败）随机冷却，跳过不冷却

use anyhow::Result;
use tokio::time::sleep;
use tracing::{error, info};

use crate::browser::driver::UiSession;
use crate::config::Config;
use crate::models::RunTally;
use crate::services::ProgressStore;
use crate::workflow::{PrivacyFlow, ProcessResult, VideoCtx};

/// 按顺序处理整个视频队列
///
/// 返回本次运行的统计；只有账本写入失败这类破坏持久化保证的
/// 错误才会让整个运行终止
pub async fn process_queue(
    session: &dyn UiSession,
    store: &mut ProgressStore,
    links: &[String],
    config: &Config,
) -> Result<RunTally> {
    let flow = PrivacyFlow::new(config);
    let mut tally = RunTally::new(links.len());

    for (index, url) in links.iter().enumerate() {
        let position = index + 1;

        if store.contains(url) {
            info!("\n[{}/{}] ⏭️  已处理过: {}", position, links.len(), url);
            tally.skipped += 1;
            continue;
        }

        info!("\n[{}/{}] 🎬 正在处理: {}", position, links.len(), url);

        let ctx = VideoCtx::new(url.clone(), position, links.len());

        match flow.run(session, &ctx).await {
            ProcessResult::Success => {
                // 先落盘再计数，崩溃丢失最多只有在途这一条
                store.mark_done(url)?;
                tally.success += 1;
                info!("✅ 隐私设置修改成功");
            }
            ProcessResult::Failed { reason } => {
                error!("❌ 处理失败 {}:", url);
                error!("   {}", reason);
                tally.failed += 1;
            }
        }

        // 成功和失败都冷却，跳过的不算"处理过"
        let cooldown = config.delays.between_videos.sample();
        info!("   ⏳ 等待 {:.1}s 后继续...", cooldown.as_secs_f64());
        sleep(cooldown).await;
    }

    Ok(tally)
}
