//! 输入语法校验
//!
//! 三个纯谓词，失败时只返回 `false`，由调用方决定如何提示用户。

use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

static SUBDOMAIN_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").ok());

static HOSTNAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .ok()
});

/// 子域名标签：仅字母、数字和连字符，不可为空（不限长度）
pub fn valid_subdomain_label(s: &str) -> bool {
    SUBDOMAIN_LABEL.as_ref().is_some_and(|re| re.is_match(s))
}

/// 任意合法的 IPv4 / IPv6 字面量
pub fn valid_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// RFC-1123 风格主机名：点分标签，每段 1-63 字符，连字符只能出现在中间
pub fn valid_hostname(s: &str) -> bool {
    HOSTNAME.as_ref().is_some_and(|re| re.is_match(s))
}
