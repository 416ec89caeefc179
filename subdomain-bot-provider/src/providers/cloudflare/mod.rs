//! Cloudflare DNS Provider

mod error;
mod http;
mod provider;
mod types;

use reqwest::{Client, RequestBuilder};

use crate::error::{ProviderError, Result};

pub use http::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, HttpTimeouts};
pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareWriteRecord};

pub(crate) const PROVIDER: &str = "cloudflare";
pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare DNS Records API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// Cloudflare 认证方式
///
/// API Token 以 Bearer 头发送；Global API Key 需要同时提供账户邮箱。
#[derive(Clone)]
pub enum CloudflareAuth {
    /// Scoped API Token
    ApiToken(String),
    /// Global API Key + 账户邮箱
    GlobalKey {
        /// 账户邮箱（`X-Auth-Email`）
        email: String,
        /// Global API Key（`X-Auth-Key`）
        key: String,
    },
}

impl std::fmt::Debug for CloudflareAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiToken(_) => f.write_str("ApiToken(***)"),
            Self::GlobalKey { email, .. } => f
                .debug_struct("GlobalKey")
                .field("email", email)
                .field("key", &"***")
                .finish(),
        }
    }
}

impl CloudflareAuth {
    /// 为请求附加认证头
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiToken(token) => request.bearer_auth(token),
            Self::GlobalKey { email, key } => request
                .header("X-Auth-Email", email)
                .header("X-Auth-Key", key),
        }
    }
}

/// Cloudflare DNS Provider
///
/// 绑定到单个 zone，所有记录操作都在该 zone 下进行。
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) auth: CloudflareAuth,
    pub(crate) zone_id: String,
}

impl CloudflareProvider {
    /// 创建 Provider
    ///
    /// `zone_id` 为空时返回 `InvalidParameter`。
    pub fn new(
        auth: CloudflareAuth,
        zone_id: impl Into<String>,
        timeouts: HttpTimeouts,
    ) -> Result<Self> {
        let zone_id = zone_id.into();
        if zone_id.trim().is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: PROVIDER.to_string(),
                param: "zone_id".to_string(),
                detail: "zone id must not be empty".to_string(),
            });
        }

        Ok(Self {
            client: http::build_client(timeouts)?,
            auth,
            zone_id,
        })
    }

    /// 绑定的 zone id
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }
}
