#![allow(dead_code)]
//! 测试共用的确定性内存假驱动
//!
//! 不碰网络也不碰真实渲染：主页读取按剧本返回快照序列，
//! 单条视频的控件可以按 URL 配置成"缺失"来模拟步骤失败

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use video_privater::browser::driver::{SessionIdentity, UiDriver, UiPage, UiSession, WaitUntil};
use video_privater::{AppError, AppResult, Config, CookieRecord, DelayRange, Delays};

/// 一次假运行的剧本和观测计数
#[derive(Default)]
pub struct FakePlan {
    /// 主页读取的快照序列，读完后停在最后一份
    pub feed_snapshots: Vec<Vec<String>>,
    /// 每个视频 URL 对应的"缺失控件"集合，命中即该步骤失败
    pub missing: HashMap<String, HashSet<String>>,
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub feed_reads: AtomicUsize,
    pub cookie_sets: AtomicUsize,
    pub injected_scripts: AtomicUsize,
}

impl FakePlan {
    pub fn new(feed_snapshots: Vec<Vec<String>>) -> Self {
        Self {
            feed_snapshots,
            ..Default::default()
        }
    }

    /// 让某条视频的某个控件永远等不到
    pub fn missing_selector(mut self, url: &str, selector: &str) -> Self {
        self.missing
            .entry(url.to_string())
            .or_default()
            .insert(selector.to_string());
        self
    }
}

pub struct FakeDriver {
    pub plan: Arc<FakePlan>,
}

impl FakeDriver {
    pub fn new(plan: Arc<FakePlan>) -> Self {
        Self { plan }
    }
}

#[async_trait]
impl UiDriver for FakeDriver {
    async fn launch(&self, _identity: &SessionIdentity) -> AppResult<Box<dyn UiSession>> {
        self.plan.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            plan: self.plan.clone(),
        }))
    }
}

pub struct FakeSession {
    pub plan: Arc<FakePlan>,
}

#[async_trait]
impl UiSession for FakeSession {
    async fn open(
        &self,
        url: &str,
        _wait_until: WaitUntil,
        _timeout: Duration,
    ) -> AppResult<Box<dyn UiPage>> {
        Ok(Box::new(FakePage::new(self.plan.clone(), url)))
    }

    async fn set_cookies(&self, _cookies: &[CookieRecord]) -> AppResult<()> {
        self.plan.cookie_sets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn inject_startup_script(&self, _script: &str) -> AppResult<()> {
        self.plan.injected_scripts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.plan.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    plan: Arc<FakePlan>,
    url: String,
}

impl FakePage {
    pub fn new(plan: Arc<FakePlan>, url: &str) -> Self {
        Self {
            plan,
            url: url.to_string(),
        }
    }

    fn step_fails(&self, selector: &str) -> bool {
        self.plan
            .missing
            .get(&self.url)
            .map_or(false, |set| set.contains(selector))
    }
}

#[async_trait]
impl UiPage for FakePage {
    async fn wait_for_match(&self, selector: &str, timeout: Option<Duration>) -> AppResult<()> {
        if self.step_fails(selector) {
            return Err(AppError::element_not_found(
                selector,
                timeout.map_or(0, |t| t.as_millis() as u64),
            ));
        }
        Ok(())
    }

    async fn hover(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        if self.step_fails(selector) {
            return Err(AppError::element_not_found(
                selector,
                timeout.as_millis() as u64,
            ));
        }
        Ok(())
    }

    async fn click(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        if self.step_fails(selector) {
            return Err(AppError::element_not_found(
                selector,
                timeout.as_millis() as u64,
            ));
        }
        Ok(())
    }

    async fn evaluate_in_page(&self, _script: &str) -> AppResult<JsonValue> {
        if self.plan.feed_snapshots.is_empty() {
            return Ok(json!([]));
        }
        let index = self.plan.feed_reads.fetch_add(1, Ordering::SeqCst);
        let index = index.min(self.plan.feed_snapshots.len() - 1);
        Ok(json!(self.plan.feed_snapshots[index]))
    }

    async fn scroll_to_bottom(&self) -> AppResult<()> {
        Ok(())
    }

    async fn wait_for_idle(&self, _timeout: Duration) -> AppResult<()> {
        Ok(())
    }
}

/// 构造测试视频链接
pub fn vid(n: usize) -> String {
    format!("https://www.tiktok.com/@tester/video/{}", n)
}

/// 所有延迟归零、文件指向临时目录的测试配置
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::new(true);
    config.delays = Delays {
        navigation: DelayRange::new(0, 0),
        hover: Duration::ZERO,
        modal_open: DelayRange::new(0, 0),
        dropdown_click: Duration::ZERO,
        option_select: DelayRange::new(0, 0),
        verification: Duration::ZERO,
        between_videos: DelayRange::new(0, 0),
    };
    config.collector.stagnant_wait = Duration::ZERO;
    config.collector.idle_fallback = Duration::ZERO;
    config.collector.idle_timeout = Duration::from_millis(1);
    config.collected_file = dir.join("videos.json");
    config.progress_file = dir.join("progress.json");
    config.cookie_file = dir.join("cookies.json");
    config
}

/// 写一份最小合法的 Cookie 文件
pub fn write_cookie_file(config: &Config) {
    std::fs::write(
        &config.cookie_file,
        r#"[{"name":"sessionid","value":"test","domain":".tiktok.com"}]"#,
    )
    .expect("写入 Cookie 文件失败");
}
