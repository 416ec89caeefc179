//! Cloudflare HTTP transport
//!
//! Every request is sent exactly once. Transport failures become
//! `NetworkError` or `Timeout`, HTTP 429 becomes `RateLimited`, 502-504 become
//! `NetworkError`; every other response is decoded as a Cloudflare envelope.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

use super::error::{Subject, map_api_error};
use super::{CF_API_BASE, CloudflareProvider, CloudflareResponse, PROVIDER};

/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP 超时配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// 建立连接
    pub connect: Duration,
    /// 整个请求，含读取响应体
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

pub(crate) fn build_client(timeouts: HttpTimeouts) -> Result<Client> {
    Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.request)
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: PROVIDER.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

fn transport_error(e: &reqwest::Error, what: &str) -> ProviderError {
    let detail = format!("{what}: {e}");
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: PROVIDER.to_string(),
            detail,
        }
    } else {
        ProviderError::NetworkError {
            provider: PROVIDER.to_string(),
            detail,
        }
    }
}

fn encode<B: Serialize>(body: &B) -> Result<String> {
    serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
        provider: PROVIDER.to_string(),
        detail: e.to_string(),
    })
}

pub(crate) fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        log::error!(
            "[cloudflare] Unparseable response ({e}): {}",
            truncate_for_log(text)
        );
        ProviderError::ParseError {
            provider: PROVIDER.to_string(),
            detail: e.to_string(),
        }
    })
}

impl CloudflareProvider {
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        subject: Subject<'_>,
    ) -> Result<CloudflareResponse<T>> {
        let url = format!("{CF_API_BASE}{path}");
        log::debug!("[cloudflare] {method} {url}");

        let mut request = self.auth.apply(self.client.request(method, &url));
        if let Some(body) = body {
            log::debug!("[cloudflare] Request Body: {}", truncate_for_log(&body));
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(&e, "Request failed"))?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&e, "Failed to read response body"))?;
        log::debug!("[cloudflare] HTTP {status}: {}", truncate_for_log(&text));

        match status {
            429 => {
                log::warn!("[cloudflare] Rate limited, retry_after={retry_after:?}");
                return Err(ProviderError::RateLimited {
                    provider: PROVIDER.to_string(),
                    retry_after,
                    raw_message: Some(truncate_for_log(&text)),
                });
            }
            502..=504 => {
                return Err(ProviderError::NetworkError {
                    provider: PROVIDER.to_string(),
                    detail: format!("HTTP {status}"),
                });
            }
            _ => {}
        }

        let envelope: CloudflareResponse<T> = decode(&text)?;
        if envelope.success {
            return Ok(envelope);
        }

        let (code, message) = envelope.first_error();
        log::warn!("[cloudflare] API error (HTTP {status}, code {code:?}): {message}");
        Err(map_api_error(code, message, status, subject, &self.zone_id))
    }

    fn missing_result() -> ProviderError {
        ProviderError::ParseError {
            provider: PROVIDER.to_string(),
            detail: "missing result field".to_string(),
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        subject: Subject<'_>,
    ) -> Result<T> {
        self.send::<T>(Method::GET, path, None, subject)
            .await?
            .result
            .ok_or_else(Self::missing_result)
    }

    /// 单页列表，返回 (记录, 总页数)
    pub(crate) async fn get_page<T: DeserializeOwned>(&self, path: &str) -> Result<(Vec<T>, u32)> {
        let envelope = self
            .send::<Vec<T>>(Method::GET, path, None, Subject::Zone)
            .await?;
        let total_pages = envelope.result_info.map_or(1, |info| info.total_pages);
        Ok((envelope.result.unwrap_or_default(), total_pages))
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        subject: Subject<'_>,
    ) -> Result<T> {
        self.send::<T>(Method::POST, path, Some(encode(body)?), subject)
            .await?
            .result
            .ok_or_else(Self::missing_result)
    }

    /// 整条覆盖
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        subject: Subject<'_>,
    ) -> Result<T> {
        self.send::<T>(Method::PUT, path, Some(encode(body)?), subject)
            .await?
            .result
            .ok_or_else(Self::missing_result)
    }

    pub(crate) async fn delete(&self, path: &str, subject: Subject<'_>) -> Result<()> {
        self.send::<serde_json::Value>(Method::DELETE, path, None, subject)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts() {
        let t = HttpTimeouts::default();
        assert_eq!(t.connect, Duration::from_secs(10));
        assert_eq!(t.request, Duration::from_secs(30));
        assert!(build_client(t).is_ok());
    }

    #[test]
    fn decode_reports_parse_errors() {
        let result: Result<serde_json::Value> = decode("<html>502 Bad Gateway</html>");
        assert!(matches!(
            result,
            Err(ProviderError::ParseError { provider, .. }) if provider == "cloudflare"
        ));
    }

    #[test]
    fn encode_write_body() {
        let body = serde_json::json!({ "name": "foo.example.com" });
        assert_eq!(encode(&body).unwrap(), r#"{"name":"foo.example.com"}"#);
    }
}
