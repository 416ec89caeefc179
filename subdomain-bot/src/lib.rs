//! Platform-agnostic application bootstrap for the subdomain bot.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter
//! injection) and the message `Dispatcher` that routes inbound chat messages
//! to commands and record-management sessions.

pub mod adapters;
mod commands;
pub mod config;
pub mod dispatcher;

use std::sync::Arc;

use subdomain_bot_core::error::{CoreError, CoreResult};
use subdomain_bot_core::services::{BotSettings, ServiceContext, SubdomainService};
use subdomain_bot_core::session::SessionManager;
use subdomain_bot_core::store::LedgerStore;
use subdomain_bot_core::traits::{DnsProvider, LedgerRepository, MessagingGateway};

pub use commands::{Command, ParseError};
pub use dispatcher::Dispatcher;

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Constructed once at startup
/// via `AppStateBuilder`.
pub struct AppState {
    /// Service context (provider, ledger, gateway, settings)
    pub ctx: Arc<ServiceContext>,
    /// Credits and subdomain ownership
    pub subdomain_service: SubdomainService,
    /// Per-user record-management sessions
    pub sessions: SessionManager,
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `provider`: DNS provider bound to the zone
/// - `ledger_repository`: how the ledger is persisted
/// - `gateway`: the chat platform
/// - `settings`: business rules (base domain, cost, ...)
pub struct AppStateBuilder {
    provider: Option<Arc<dyn DnsProvider>>,
    ledger_repository: Option<Arc<dyn LedgerRepository>>,
    gateway: Option<Arc<dyn MessagingGateway>>,
    settings: Option<BotSettings>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            ledger_repository: None,
            gateway: None,
            settings: None,
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn DnsProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn ledger_repository(mut self, repo: Arc<dyn LedgerRepository>) -> Self {
        self.ledger_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn gateway(mut self, gateway: Arc<dyn MessagingGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: BotSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the `AppState`, loading the ledger from the repository.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub async fn build(self) -> CoreResult<AppState> {
        let provider = self
            .provider
            .ok_or_else(|| CoreError::ValidationError("provider is required".to_string()))?;
        let ledger_repository = self.ledger_repository.ok_or_else(|| {
            CoreError::ValidationError("ledger_repository is required".to_string())
        })?;
        let gateway = self
            .gateway
            .ok_or_else(|| CoreError::ValidationError("gateway is required".to_string()))?;
        let settings = self
            .settings
            .ok_or_else(|| CoreError::ValidationError("settings are required".to_string()))?;

        let ledger = Arc::new(LedgerStore::load(ledger_repository).await);
        let ctx = Arc::new(ServiceContext::new(provider, ledger, gateway, settings));

        Ok(AppState {
            subdomain_service: SubdomainService::new(Arc::clone(&ctx)),
            sessions: SessionManager::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
