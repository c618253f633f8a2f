//! 登录会话数据模型
//!
//! 浏览器导出的 Cookie 记录，加载一次后只读

use serde::{Deserialize, Serialize};

/// 单条 Cookie 记录
///
/// `name` / `value` / `domain` 必填；过期时间兼容 `expires` 和
/// `expirationDate` 两种字段名，缺省则为会话 Cookie
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,

    #[serde(default = "default_cookie_path")]
    pub path: String,

    #[serde(default)]
    pub secure: bool,

    #[serde(default, rename = "httpOnly")]
    pub http_only: bool,

    /// Unix 秒时间戳，浏览器导出时可能带小数
    #[serde(default, alias = "expirationDate")]
    pub expires: Option<f64>,
}

fn default_cookie_path() -> String {
    "/".to_string()
}
