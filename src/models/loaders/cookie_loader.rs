use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult, AuthError};
use crate::models::cookies::CookieRecord;

/// Cookie 文件的两种合法形态：裸数组，或带 cookies 数组字段的对象
#[derive(Deserialize)]
#[serde(untagged)]
enum CookieFile {
    Bare(Vec<CookieRecord>),
    Wrapped { cookies: Vec<CookieRecord> },
}

/// 从 JSON 文件加载登录 Cookie
///
/// 文件不存在或形态不合法都是致命错误，调用方应当在产生任何
/// 阶段副作用之前调用本函数
pub fn load_cookie_file(path: &Path) -> AppResult<Vec<CookieRecord>> {
    if !path.exists() {
        return Err(AppError::Auth(AuthError::CookieFileMissing {
            path: path.display().to_string(),
        }));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let parsed: CookieFile = serde_json::from_str(&content).map_err(|e| {
        AppError::Auth(AuthError::MalformedCookieFile {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    })?;

    let cookies = match parsed {
        CookieFile::Bare(cookies) => cookies,
        CookieFile::Wrapped { cookies } => cookies,
    };

    info!("🔐 已从 {} 加载 {} 条登录 Cookie", path.display(), cookies.len());

    Ok(cookies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(content.as_bytes()).expect("写入临时文件失败");
        file
    }

    #[test]
    fn test_bare_array_shape() {
        let file = write_temp(
            r#"[{"name":"sessionid","value":"abc","domain":".tiktok.com","secure":true}]"#,
        );

        let cookies = load_cookie_file(file.path()).expect("裸数组形态应该能加载");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "sessionid");
        assert!(cookies[0].secure);
    }

    #[test]
    fn test_wrapped_object_shape() {
        let file = write_temp(
            r#"{"cookies":[{"name":"sid","value":"v","domain":"d","httpOnly":true}]}"#,
        );

        let cookies = load_cookie_file(file.path()).expect("对象形态应该能加载");
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].http_only);
    }

    #[test]
    fn test_cookies_field_not_an_array() {
        let file = write_temp(r#"{"cookies": 5}"#);

        let err = load_cookie_file(file.path()).expect_err("cookies 不是数组应该失败");
        assert!(matches!(
            err,
            AppError::Auth(AuthError::MalformedCookieFile { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let path = dir.path().join("no_such_cookies.json");

        let err = load_cookie_file(&path).expect_err("文件缺失应该失败");
        assert!(matches!(
            err,
            AppError::Auth(AuthError::CookieFileMissing { .. })
        ));
    }
}
