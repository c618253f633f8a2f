//! Chromium 驱动实现 - 基础设施层
//!
//! 持有唯一的 Browser / Page 资源，对上只暴露 UiDriver 能力。
//! 所有页面交互都通过注入 JS 完成，定位和动作在一次求值里原子执行

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetTimezoneOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, TimeSinceEpoch};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::driver::{SessionIdentity, UiDriver, UiPage, UiSession, WaitUntil};
use crate::error::{AppError, AppResult, BrowserError};
use crate::models::CookieRecord;

/// 控件轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// 网络静默采样间隔
const IDLE_POLL: Duration = Duration::from_millis(500);
/// 连续多少次采样资源数不变视为静默
const IDLE_QUIET_POLLS: usize = 2;

const RESOURCE_COUNT_JS: &str = "window.performance.getEntriesByType('resource').length";

/// Chromium 驱动
pub struct ChromiumDriver;

impl ChromiumDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChromiumDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UiDriver for ChromiumDriver {
    async fn launch(&self, identity: &SessionIdentity) -> AppResult<Box<dyn UiSession>> {
        info!("🚀 启动浏览器...");

        let (width, height) = identity.viewport;
        let config = BrowserConfig::builder()
            .with_head()
            .window_size(width, height)
            .args(vec![
                format!("--user-agent={}", identity.user_agent),
                format!("--lang={}", identity.locale),
            ])
            .build()
            .map_err(|e| AppError::Other(format!("配置浏览器失败: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(AppError::launch_failed)?;

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 短暂延迟等待浏览器状态同步
        sleep(Duration::from_millis(300)).await;

        let page = browser.new_page("about:blank").await.map_err(|e| {
            AppError::Browser(BrowserError::PageCreationFailed {
                source: Box::new(e),
            })
        })?;

        // 时区跟随会话身份
        let timezone = SetTimezoneOverrideParams::builder()
            .timezone_id(identity.timezone.clone())
            .build()
            .map_err(|e| AppError::Other(format!("设置时区失败: {}", e)))?;
        page.execute(timezone)
            .await
            .map_err(AppError::script_execution_failed)?;

        debug!("浏览器启动成功, 视口 {}x{}", width, height);

        Ok(Box::new(ChromiumSession {
            browser: Mutex::new(browser),
            page,
            _handler: handler_task,
        }))
    }
}

/// Chromium 会话
///
/// 整个会话复用同一个 Page：open 只是在这个页面上导航，
/// 这保证了同一时刻只有一个页面、一个在途 UI 操作
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    page: Page,
    _handler: tokio::task::JoinHandle<()>,
}

#[async_trait]
impl UiSession for ChromiumSession {
    async fn open(
        &self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> AppResult<Box<dyn UiPage>> {
        let navigation = async {
            self.page.goto(url.to_string()).await?;
            if wait_until == WaitUntil::Load {
                self.page.wait_for_navigation().await?;
            }
            Ok::<(), chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => Ok(Box::new(ChromiumPage {
                page: self.page.clone(),
            })),
            Ok(Err(e)) => Err(AppError::navigation_failed(url, e)),
            Err(_) => Err(AppError::Browser(BrowserError::NavigationTimeout {
                url: url.to_string(),
                waited_ms: timeout.as_millis() as u64,
            })),
        }
    }

    async fn set_cookies(&self, cookies: &[CookieRecord]) -> AppResult<()> {
        let mut params = Vec::with_capacity(cookies.len());

        for cookie in cookies {
            let mut builder = CookieParam::builder()
                .name(cookie.name.clone())
                .value(cookie.value.clone())
                .domain(cookie.domain.clone())
                .path(cookie.path.clone())
                .secure(cookie.secure)
                .http_only(cookie.http_only);

            // 导出的时间戳可能带小数，取整为秒；缺省则为会话 Cookie
            if let Some(expires) = cookie.expires {
                builder = builder.expires(TimeSinceEpoch::new(expires.floor()));
            }

            let param = builder.build().map_err(|e| {
                AppError::Browser(BrowserError::CookieInjectionFailed {
                    detail: format!("{} ({})", e, cookie.name),
                })
            })?;
            params.push(param);
        }

        self.page.set_cookies(params).await.map_err(|e| {
            AppError::Browser(BrowserError::CookieInjectionFailed {
                detail: e.to_string(),
            })
        })?;

        Ok(())
    }

    async fn inject_startup_script(&self, script: &str) -> AppResult<()> {
        let params = AddScriptToEvaluateOnNewDocumentParams::builder()
            .source(script.to_string())
            .build()
            .map_err(AppError::Other)?;

        self.page
            .execute(params)
            .await
            .map_err(AppError::script_execution_failed)?;

        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        let _ = browser.wait().await;
        debug!("浏览器会话已释放");
        Ok(())
    }
}

/// Chromium 页面
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    /// 执行 JS 并反序列化为指定类型
    async fn eval<T: DeserializeOwned>(&self, js: String) -> AppResult<T> {
        let result = self
            .page
            .evaluate(js)
            .await
            .map_err(AppError::script_execution_failed)?;
        result.into_value().map_err(AppError::script_execution_failed)
    }
}

#[async_trait]
impl UiPage for ChromiumPage {
    async fn wait_for_match(&self, selector: &str, timeout: Option<Duration>) -> AppResult<()> {
        let js = probe_js(selector);
        let started = Instant::now();

        loop {
            let found: bool = self.eval(js.clone()).await?;
            if found {
                return Ok(());
            }
            if let Some(limit) = timeout {
                if started.elapsed() >= limit {
                    return Err(AppError::element_not_found(
                        selector,
                        limit.as_millis() as u64,
                    ));
                }
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn hover(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        self.act(selector, hover_js(selector), timeout).await
    }

    async fn click(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        self.act(selector, click_js(selector), timeout).await
    }

    async fn evaluate_in_page(&self, script: &str) -> AppResult<JsonValue> {
        self.eval(script.to_string()).await
    }

    async fn scroll_to_bottom(&self) -> AppResult<()> {
        let _: bool = self
            .eval("(() => { window.scrollTo(0, document.body.scrollHeight); return true; })()".to_string())
            .await?;
        Ok(())
    }

    async fn wait_for_idle(&self, timeout: Duration) -> AppResult<()> {
        let started = Instant::now();
        let mut last: u64 = self.eval(RESOURCE_COUNT_JS.to_string()).await?;
        let mut quiet_polls = 0;

        loop {
            if started.elapsed() >= timeout {
                return Err(AppError::Browser(BrowserError::IdleTimeout {
                    waited_ms: timeout.as_millis() as u64,
                }));
            }
            sleep(IDLE_POLL).await;

            let current: u64 = self.eval(RESOURCE_COUNT_JS.to_string()).await?;
            if current == last {
                quiet_polls += 1;
                if quiet_polls >= IDLE_QUIET_POLLS {
                    return Ok(());
                }
            } else {
                quiet_polls = 0;
                last = current;
            }
        }
    }
}

impl ChromiumPage {
    /// 轮询执行"定位并动作"脚本，直到动作完成或超时
    ///
    /// 脚本只在定位成功的那一次求值里执行动作，所以动作至多发生一次
    async fn act(&self, selector: &str, js: String, timeout: Duration) -> AppResult<()> {
        let started = Instant::now();

        loop {
            let done: bool = self.eval(js.clone()).await?;
            if done {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(AppError::element_not_found(
                    selector,
                    timeout.as_millis() as u64,
                ));
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

// ========== 选择器编译 ==========

/// 选择器的三种形式
#[derive(Debug, PartialEq, Eq)]
enum SelectorKind<'a> {
    /// 普通 CSS 选择器
    Css(&'a str),
    /// 按元素自有文本匹配
    Text { needle: &'a str, parent_svg: bool },
}

fn parse_selector(selector: &str) -> SelectorKind<'_> {
    match selector.strip_prefix("text=") {
        Some(rest) => match rest.strip_suffix(" >> .. >> svg") {
            Some(needle) => SelectorKind::Text {
                needle,
                parent_svg: true,
            },
            None => SelectorKind::Text {
                needle: rest,
                parent_svg: false,
            },
        },
        None => SelectorKind::Css(selector),
    }
}

/// 转成 JS 字符串字面量
fn js_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// 生成"定位目标元素到 hit 变量"的 JS 语句
///
/// 文本匹配只看元素的直接文本节点，优先精确相等，退而取首个包含者
fn locator_snippet(selector: &str) -> String {
    match parse_selector(selector) {
        SelectorKind::Css(css) => {
            format!("let hit = document.querySelector({});", js_string(css))
        }
        SelectorKind::Text { needle, parent_svg } => {
            let parent_step = if parent_svg {
                "if (hit) { hit = hit.parentElement ? hit.parentElement.querySelector('svg') : null; }"
            } else {
                ""
            };
            format!(
                r#"const needle = {};
let hit = null;
for (const el of document.querySelectorAll('body *')) {{
    const own = Array.from(el.childNodes)
        .filter(n => n.nodeType === Node.TEXT_NODE)
        .map(n => n.textContent)
        .join('')
        .trim();
    if (own === needle) {{ hit = el; break; }}
    if (!hit && own.includes(needle)) {{ hit = el; }}
}}
{}"#,
                js_string(needle),
                parent_step
            )
        }
    }
}

fn probe_js(selector: &str) -> String {
    format!("(() => {{ {} return !!hit; }})()", locator_snippet(selector))
}

// 下拉框的展开图标是 svg，Element 上没有 click()，统一派发合成事件
fn click_js(selector: &str) -> String {
    format!(
        "(() => {{ {} if (!hit) return false; \
         hit.scrollIntoView({{ block: 'center' }}); \
         hit.dispatchEvent(new MouseEvent('click', {{ bubbles: true, cancelable: true }})); \
         return true; }})()",
        locator_snippet(selector)
    )
}

fn hover_js(selector: &str) -> String {
    format!(
        "(() => {{ {} if (!hit) return false; \
         for (const type of ['mouseover', 'mouseenter']) {{ \
         hit.dispatchEvent(new MouseEvent(type, {{ bubbles: true, cancelable: true }})); }} \
         return true; }})()",
        locator_snippet(selector)
    )
}
