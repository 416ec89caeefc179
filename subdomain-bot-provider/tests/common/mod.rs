//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use subdomain_bot_provider::{
    CloudflareAuth, CloudflareProvider, CreateDnsRecordRequest, DnsProvider, DnsRecord,
    DnsRecordType, HttpTimeouts,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试记录标签
pub fn generate_test_label() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 测试上下文 - 封装 Provider 和 zone 域名
pub struct TestContext {
    pub provider: Arc<dyn DnsProvider>,
    pub base_domain: String,
}

impl TestContext {
    /// 从环境变量创建 Cloudflare 测试上下文
    ///
    /// 优先使用 `CLOUDFLARE_API_TOKEN`，否则使用 `CLOUDFLARE_EMAIL` + `CLOUDFLARE_API_KEY`。
    pub fn cloudflare() -> Option<Self> {
        let zone_id = env::var("CLOUDFLARE_ZONE_ID").ok()?;
        let base_domain = env::var("TEST_DOMAIN").ok()?;

        let auth = match env::var("CLOUDFLARE_API_TOKEN") {
            Ok(token) => CloudflareAuth::ApiToken(token),
            Err(_) => CloudflareAuth::GlobalKey {
                email: env::var("CLOUDFLARE_EMAIL").ok()?,
                key: env::var("CLOUDFLARE_API_KEY").ok()?,
            },
        };

        let provider = CloudflareProvider::new(auth, zone_id, HttpTimeouts::default()).ok()?;

        Some(Self {
            provider: Arc::new(provider),
            base_domain,
        })
    }

    /// 完整记录名
    pub fn fqdn(&self, label: &str) -> String {
        format!("{label}.{}", self.base_domain)
    }

    /// 创建一条 TXT 测试记录
    pub async fn create_test_record(&self) -> Option<DnsRecord> {
        let request = CreateDnsRecordRequest::auto(
            DnsRecordType::Txt,
            self.fqdn(&generate_test_label()),
            "integration-test",
        );
        self.provider.create_record(&request).await.ok()
    }

    /// 清理测试记录
    pub async fn cleanup_record(&self, record_id: &str) {
        let _ = self.provider.delete_record(record_id).await;
    }

    /// 查找并清理所有测试记录（以 _test- 开头的记录）
    pub async fn cleanup_all_test_records(&self) {
        if let Ok(records) = self.provider.list_records().await {
            for record in records {
                if record.name.starts_with("_test-") {
                    let _ = self.provider.delete_record(&record.id).await;
                }
            }
        }
    }
}
