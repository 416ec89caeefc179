//! 日志截断
//!
//! 响应体和请求体可能很长，也可能带着记录内容，写日志前统一截断。

const LOG_LIMIT: usize = 256;

/// 超过 256 字节时截断（按字符边界），并附上原始长度。
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= LOG_LIMIT {
        return s.to_string();
    }
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= LOG_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_short_bodies() {
        let body = r#"{"success":true,"result":[]}"#;
        assert_eq!(truncate_for_log(body), body);
        assert_eq!(truncate_for_log(&"x".repeat(LOG_LIMIT)).len(), LOG_LIMIT);
    }

    #[test]
    fn cuts_long_bodies() {
        let body = "y".repeat(1000);
        let out = truncate_for_log(&body);
        assert!(out.starts_with(&"y".repeat(LOG_LIMIT)));
        assert!(out.ends_with("... [truncated, total 1000 bytes]"));
    }

    #[test]
    fn never_splits_a_character() {
        // 3 字节字符，256 不是边界
        let body = "域".repeat(100);
        let out = truncate_for_log(&body);
        let kept = out.split("...").next().unwrap();
        assert_eq!(kept.len(), 255);
        assert!(out.ends_with("total 300 bytes]"));
    }
}
