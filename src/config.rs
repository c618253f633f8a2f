use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;

use crate::browser::driver::SessionIdentity;

/// 慢速模式下所有延迟统一放大的倍数
const HUMAN_PACE_FACTOR: u64 = 3;

/// 延迟区间（毫秒），每次使用时在 [min, max] 内均匀采样
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// 在区间内随机采样一个延迟
    pub fn sample(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    const fn scaled(&self, factor: u64) -> Self {
        Self::new(self.min_ms * factor, self.max_ms * factor)
    }
}

/// 各阶段延迟配置
///
/// 有两个作用：等待页面瞬态状态稳定下来，同时避免呈现出机器般
/// 规律的操作节奏
#[derive(Clone, Debug)]
pub struct Delays {
    /// 页面导航完成后
    pub navigation: DelayRange,
    /// 悬停设置按钮后
    pub hover: Duration,
    /// 隐私弹窗打开后
    pub modal_open: DelayRange,
    /// 点击下拉框后
    pub dropdown_click: Duration,
    /// 选中选项后
    pub option_select: DelayRange,
    /// 点击确认后的观察等待
    pub verification: Duration,
    /// 视频之间的冷却
    pub between_videos: DelayRange,
}

impl Delays {
    /// 构建延迟表，`fast_mode` 关闭时统一放大为更接近人工的节奏
    fn new(fast_mode: bool) -> Self {
        let factor = if fast_mode { 1 } else { HUMAN_PACE_FACTOR };
        Self {
            navigation: DelayRange::new(1_000, 2_000).scaled(factor),
            hover: Duration::from_millis(300 * factor),
            modal_open: DelayRange::new(500, 1_000).scaled(factor),
            dropdown_click: Duration::from_millis(800 * factor),
            option_select: DelayRange::new(500, 1_000).scaled(factor),
            verification: Duration::from_millis(1_000 * factor),
            between_videos: DelayRange::new(2_000, 3_000).scaled(factor),
        }
    }
}

/// 每个流程步骤定位控件的时间预算
///
/// 导航和弹窗发现给最长预算，最后的确认点击给最短预算
#[derive(Clone, Debug)]
pub struct StepTimeouts {
    pub navigation: Duration,
    pub settings_button: Duration,
    pub privacy_menu: Duration,
    pub privacy_modal: Duration,
    pub dropdown_trigger: Duration,
    pub option_appear: Duration,
    pub done_button: Duration,
    pub confirm_click: Duration,
}

impl Default for StepTimeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            settings_button: Duration::from_secs(15),
            privacy_menu: Duration::from_secs(10),
            privacy_modal: Duration::from_secs(15),
            dropdown_trigger: Duration::from_secs(10),
            option_appear: Duration::from_secs(10),
            done_button: Duration::from_secs(10),
            confirm_click: Duration::from_secs(5),
        }
    }
}

/// 收集阶段配置
#[derive(Clone, Debug)]
pub struct CollectorConfig {
    /// 滚动迭代硬上限
    pub max_scroll_iterations: usize,
    /// 连续多少次没有新内容后停止
    pub max_stagnant_scrolls: usize,
    /// 滚动后等待网络静默的预算
    pub idle_timeout: Duration,
    /// 网络未静默时的固定回退等待
    pub idle_fallback: Duration,
    /// 停滞时的加长等待（内容可能只是慢，不是没了）
    pub stagnant_wait: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_scroll_iterations: 100,
            max_stagnant_scrolls: 5,
            idle_timeout: Duration::from_secs(5),
            idle_fallback: Duration::from_secs(2),
            stagnant_wait: Duration::from_secs(3),
        }
    }
}

/// 程序配置
///
/// 在 main 中构建一次，只读地传给各组件，任何组件都不从
/// 环境或全局状态读配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 快速模式（关闭后所有延迟统一放大）
    pub fast_mode: bool,
    pub delays: Delays,
    pub timeouts: StepTimeouts,
    pub collector: CollectorConfig,
    /// 浏览器会话身份（UA、视口、地区）
    pub identity: SessionIdentity,
    /// 收集结果文件，每次运行整体覆盖
    pub collected_file: PathBuf,
    /// 完成账本文件，每次成功后整体重写
    pub progress_file: PathBuf,
    /// 登录 Cookie 导入文件
    pub cookie_file: PathBuf,
}

impl Config {
    pub fn new(fast_mode: bool) -> Self {
        Self {
            fast_mode,
            delays: Delays::new(fast_mode),
            timeouts: StepTimeouts::default(),
            collector: CollectorConfig::default(),
            identity: SessionIdentity::default(),
            collected_file: PathBuf::from("videos.json"),
            progress_file: PathBuf::from("progress.json"),
            cookie_file: PathBuf::from("cookies.json"),
        }
    }

    /// 主页地址
    pub fn profile_url(&self, username: &str) -> String {
        format!("https://www.tiktok.com/@{}", username)
    }
}
