use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cloudflare 调用失败的统一错误
///
/// 每个变体都带 `provider` 字段；`Display` 以 `[provider]` 开头。
/// 请求从不自动重试，`NetworkError` / `Timeout` / `RateLimited` 由调用方原样上报。
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// 连接失败、DNS 解析失败、上游网关错误
    #[error("[{provider}] Network error: {detail}")]
    NetworkError { provider: String, detail: String },

    /// Token / Key 无效或过期
    #[error("[{provider}] Invalid credentials{}", suffix(.raw_message.as_deref()))]
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    #[error("[{provider}] Record '{record_name}' already exists")]
    RecordExists {
        provider: String,
        record_name: String,
        raw_message: Option<String>,
    },

    #[error("[{provider}] Record '{record_id}' not found")]
    RecordNotFound {
        provider: String,
        record_id: String,
        raw_message: Option<String>,
    },

    /// 记录名、内容、TTL 等被 API 拒绝
    #[error("[{provider}] Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        provider: String,
        param: String,
        detail: String,
    },

    /// zone 记录数达到上限
    #[error("[{provider}] Quota exceeded")]
    QuotaExceeded {
        provider: String,
        raw_message: Option<String>,
    },

    /// HTTP 429
    #[error("[{provider}] Rate limited{}", retry_suffix(.retry_after.as_ref().copied()))]
    RateLimited {
        provider: String,
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    #[error("[{provider}] Request timeout: {detail}")]
    Timeout { provider: String, detail: String },

    /// 配置的 zone id 不存在
    #[error("[{provider}] Zone '{domain}' not found{}", suffix(.raw_message.as_deref()))]
    DomainNotFound {
        provider: String,
        domain: String,
        raw_message: Option<String>,
    },

    /// 凭据有效但无权操作该 zone
    #[error("[{provider}] Permission denied{}", suffix(.raw_message.as_deref()))]
    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// 响应体不是预期的 JSON
    #[error("[{provider}] Parse error: {detail}")]
    ParseError { provider: String, detail: String },

    #[error("[{provider}] Serialization error: {detail}")]
    SerializationError { provider: String, detail: String },

    /// 未收录的错误码
    #[error("[{provider}] {raw_message}")]
    Unknown {
        provider: String,
        raw_code: Option<String>,
        raw_message: String,
    },
}

fn suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

fn retry_suffix(retry_after: Option<u64>) -> String {
    retry_after
        .map(|secs| format!(" (retry after {secs}s)"))
        .unwrap_or_default()
}

impl ProviderError {
    /// 产生该错误的 provider 标识
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::RecordExists { provider, .. }
            | Self::RecordNotFound { provider, .. }
            | Self::InvalidParameter { provider, .. }
            | Self::QuotaExceeded { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::DomainNotFound { provider, .. }
            | Self::PermissionDenied { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::SerializationError { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }

    /// 用户输入或远端状态导致的错误，记 `warn`；其余记 `error`。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::RecordExists { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::QuotaExceeded { .. }
                | Self::DomainNotFound { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// 远端不可达或未及时应答
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
