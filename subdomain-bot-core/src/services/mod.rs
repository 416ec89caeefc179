//! 业务逻辑服务层

mod subdomain_service;

pub use subdomain_service::{CreatedSubdomain, RemovalReport, ResetChallenge, SubdomainService};

use std::sync::Arc;
use std::time::Duration;

use crate::store::LedgerStore;
use crate::traits::{DnsProvider, MessagingGateway};

/// 创建子域名的默认费用（积分）
pub const DEFAULT_SUBDOMAIN_COST: u64 = 10;
/// 新子域名占位 A 记录的默认地址
pub const DEFAULT_PLACEHOLDER_ADDRESS: &str = "1.2.3.4";
/// `reset_all` 确认窗口的默认时长（秒）
pub const DEFAULT_RESET_CONFIRMATION_SECS: u64 = 60;

/// 业务规则参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    /// 所有子域名挂载的基础域名
    pub base_domain: String,
    /// 创建子域名的费用
    pub subdomain_cost: u64,
    /// 占位 A 记录地址
    pub placeholder_address: String,
    /// `reset_all` 确认窗口
    pub reset_confirmation_window: Duration,
}

impl BotSettings {
    /// 使用默认费用、占位地址和确认窗口
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
            subdomain_cost: DEFAULT_SUBDOMAIN_COST,
            placeholder_address: DEFAULT_PLACEHOLDER_ADDRESS.to_string(),
            reset_confirmation_window: Duration::from_secs(DEFAULT_RESET_CONFIRMATION_SECS),
        }
    }

    /// `label.BASE_DOMAIN`
    pub fn fqdn(&self, label: &str) -> String {
        format!("{label}.{}", self.base_domain)
    }

    /// 去掉基础域名后缀，用于展示；基础域名本身显示为 `@`
    pub fn relative_name(&self, name: &str) -> String {
        if name == self.base_domain {
            return "@".to_string();
        }
        name.strip_suffix(&format!(".{}", self.base_domain))
            .unwrap_or(name)
            .to_string()
    }
}

/// 记录 `name` 是否属于子域名 `domain_fqdn`（本身或其下级）
pub fn belongs_to(name: &str, domain_fqdn: &str) -> bool {
    name == domain_fqdn
        || name
            .strip_suffix(domain_fqdn)
            .is_some_and(|head| head.ends_with('.'))
}

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入 DNS Provider、账本仓库和消息网关。
pub struct ServiceContext {
    /// 绑定到 zone 的 DNS Provider
    pub provider: Arc<dyn DnsProvider>,
    /// 账本
    pub ledger: Arc<LedgerStore>,
    /// 消息网关
    pub gateway: Arc<dyn MessagingGateway>,
    /// 业务规则参数
    pub settings: BotSettings,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        provider: Arc<dyn DnsProvider>,
        ledger: Arc<LedgerStore>,
        gateway: Arc<dyn MessagingGateway>,
        settings: BotSettings,
    ) -> Self {
        Self {
            provider,
            ledger,
            gateway,
            settings,
        }
    }
}
