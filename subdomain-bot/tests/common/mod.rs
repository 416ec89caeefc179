//! Shared mocks for the bot integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use subdomain_bot::{AppState, AppStateBuilder, Dispatcher};
use subdomain_bot_core::error::{CoreError, CoreResult};
use subdomain_bot_core::services::BotSettings;
use subdomain_bot_core::traits::{DnsProvider, LedgerRepository, MessagingGateway};
use subdomain_bot_core::types::{
    ChannelKind, CreateDnsRecordRequest, DnsRecord, DnsRecordType, InboundMessage, Ledger, Reply,
    TTL_AUTO, UpdateDnsRecordRequest,
};
use subdomain_bot_provider::{ProviderError, Result as ProviderResult};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

// ===== Mock Implementations =====

/// In-memory zone.
pub struct MemoryDnsProvider {
    records: RwLock<Vec<DnsRecord>>,
    next_id: RwLock<u64>,
    unavailable: RwLock<bool>,
    listing_gate: Arc<Mutex<()>>,
}

impl MemoryDnsProvider {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: RwLock::new(1),
            unavailable: RwLock::new(false),
            listing_gate: Arc::new(Mutex::new(())),
        }
    }

    /// `list_records` stalls until the returned guard is dropped.
    pub async fn hold_listings(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.listing_gate).lock_owned().await
    }

    /// Every call fails with a network error while set.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    pub async fn records(&self) -> Vec<DnsRecord> {
        self.records.read().await.clone()
    }

    pub async fn insert(&self, record_type: DnsRecordType, name: &str, content: &str) -> String {
        let id = self.allocate_id().await;
        self.records.write().await.push(DnsRecord {
            id: id.clone(),
            record_type,
            name: name.to_string(),
            content: content.to_string(),
            ttl: TTL_AUTO,
            proxied: false,
            priority: None,
        });
        id
    }

    async fn allocate_id(&self) -> String {
        let mut next = self.next_id.write().await;
        let id = format!("rec-{next}");
        *next += 1;
        id
    }

    async fn check(&self) -> ProviderResult<()> {
        if *self.unavailable.read().await {
            return Err(ProviderError::NetworkError {
                provider: "memory".to_string(),
                detail: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(record_id: &str) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: "memory".to_string(),
            record_id: record_id.to_string(),
            raw_message: None,
        }
    }
}

#[async_trait]
impl DnsProvider for MemoryDnsProvider {
    fn id(&self) -> &'static str {
        "memory"
    }

    async fn list_records(&self) -> ProviderResult<Vec<DnsRecord>> {
        let _open = self.listing_gate.lock().await;
        self.check().await?;
        Ok(self.records().await)
    }

    async fn get_record(&self, record_id: &str) -> ProviderResult<DnsRecord> {
        self.check().await?;
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or_else(|| Self::not_found(record_id))
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> ProviderResult<DnsRecord> {
        self.check().await?;
        let record = DnsRecord {
            id: self.allocate_id().await,
            record_type: req.record_type.clone(),
            name: req.name.clone(),
            content: req.content.clone(),
            ttl: req.ttl,
            proxied: req.proxied,
            priority: req.priority,
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> ProviderResult<DnsRecord> {
        self.check().await?;
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Self::not_found(record_id))?;
        record.content = req.content.clone();
        Ok(record.clone())
    }

    async fn delete_record(&self, record_id: &str) -> ProviderResult<()> {
        self.check().await?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Self::not_found(record_id));
        }
        Ok(())
    }
}

/// Ledger repository kept in memory.
pub struct MemoryLedgerRepository {
    stored: RwLock<Option<Ledger>>,
    load_error: Option<String>,
}

impl MemoryLedgerRepository {
    pub fn new() -> Self {
        Self {
            stored: RwLock::new(None),
            load_error: None,
        }
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            stored: RwLock::new(Some(ledger)),
            load_error: None,
        }
    }

    pub fn corrupted(message: &str) -> Self {
        Self {
            stored: RwLock::new(None),
            load_error: Some(message.to_string()),
        }
    }

    pub async fn saved(&self) -> Option<Ledger> {
        self.stored.read().await.clone()
    }
}

#[async_trait]
impl LedgerRepository for MemoryLedgerRepository {
    async fn load(&self) -> CoreResult<Option<Ledger>> {
        if let Some(msg) = &self.load_error {
            return Err(CoreError::SerializationError(msg.clone()));
        }
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, ledger: &Ledger) -> CoreResult<()> {
        *self.stored.write().await = Some(ledger.clone());
        Ok(())
    }
}

/// Gateway that records every outgoing reply.
pub struct RecordingGateway {
    direct: RwLock<Vec<(String, Reply)>>,
    channel: RwLock<Vec<(String, Reply)>>,
    admins: HashSet<String>,
    unreachable: RwLock<HashSet<String>>,
}

impl RecordingGateway {
    pub fn new(admins: &[&str]) -> Self {
        Self {
            direct: RwLock::new(Vec::new()),
            channel: RwLock::new(Vec::new()),
            admins: admins.iter().map(ToString::to_string).collect(),
            unreachable: RwLock::new(HashSet::new()),
        }
    }

    pub async fn block_direct(&self, user_id: &str) {
        self.unreachable.write().await.insert(user_id.to_string());
    }

    pub async fn direct_to(&self, user_id: &str) -> Vec<Reply> {
        self.direct
            .read()
            .await
            .iter()
            .filter(|(to, _)| to == user_id)
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    pub async fn channel(&self, channel_id: &str) -> Vec<Reply> {
        self.channel
            .read()
            .await
            .iter()
            .filter(|(to, _)| to == channel_id)
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    pub async fn last_direct(&self, user_id: &str) -> Reply {
        self.direct_to(user_id)
            .await
            .pop()
            .unwrap_or_else(|| panic!("no DM sent to {user_id}"))
    }

    pub async fn last_channel(&self, channel_id: &str) -> Reply {
        self.channel(channel_id)
            .await
            .pop()
            .unwrap_or_else(|| panic!("nothing posted in {channel_id}"))
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_direct(&self, user_id: &str, reply: &Reply) -> CoreResult<()> {
        if self.unreachable.read().await.contains(user_id) {
            return Err(CoreError::Gateway(format!("cannot DM {user_id}")));
        }
        self.direct
            .write()
            .await
            .push((user_id.to_string(), reply.clone()));
        Ok(())
    }

    async fn send_channel(&self, channel_id: &str, reply: &Reply) -> CoreResult<()> {
        self.channel
            .write()
            .await
            .push((channel_id.to_string(), reply.clone()));
        Ok(())
    }

    async fn resolve_user(&self, mention: &str) -> Option<String> {
        let id = mention.trim_start_matches('@');
        (!id.is_empty() && id != "ghost").then(|| id.to_string())
    }

    async fn is_administrator(&self, user_id: &str, _channel_id: &str) -> bool {
        self.admins.contains(user_id)
    }

    fn latency(&self) -> Option<Duration> {
        Some(Duration::from_millis(42))
    }
}

// ===== Harness =====

pub const BASE_DOMAIN: &str = "example.com";
pub const CHANNEL: &str = "general";
pub const ADMIN: &str = "root";

pub struct Bot {
    pub dispatcher: Arc<Dispatcher>,
    pub provider: Arc<MemoryDnsProvider>,
    pub repository: Arc<MemoryLedgerRepository>,
    pub gateway: Arc<RecordingGateway>,
}

impl Bot {
    pub async fn new() -> Self {
        Self::with_settings(BotSettings::new(BASE_DOMAIN)).await
    }

    pub async fn with_settings(settings: BotSettings) -> Self {
        let provider = Arc::new(MemoryDnsProvider::new());
        let repository = Arc::new(MemoryLedgerRepository::new());
        let gateway = Arc::new(RecordingGateway::new(&[ADMIN]));

        let state = AppStateBuilder::new()
            .provider(provider.clone())
            .ledger_repository(repository.clone())
            .gateway(gateway.clone())
            .settings(settings)
            .build()
            .await
            .expect("failed to build AppState");

        Self {
            dispatcher: Arc::new(Dispatcher::new(Arc::new(state), "%")),
            provider,
            repository,
            gateway,
        }
    }

    pub fn state(&self) -> &AppState {
        self.dispatcher.state()
    }

    /// Message from `user` in the shared group channel.
    pub async fn say(&self, user: &str, content: &str) {
        self.dispatcher
            .dispatch(message(user, ChannelKind::Group, CHANNEL, content))
            .await;
    }

    /// Direct message from `user` to the bot.
    pub async fn dm(&self, user: &str, content: &str) {
        self.dispatcher
            .dispatch(message(user, ChannelKind::Direct, user, content))
            .await;
    }

    /// Queue a group-channel message on the author's lane without waiting.
    pub async fn submit(&self, user: &str, content: &str) {
        self.dispatcher
            .submit(message(user, ChannelKind::Group, CHANNEL, content))
            .await;
    }

    pub async fn credits(&self, user: &str) -> u64 {
        self.state()
            .ctx
            .ledger
            .account(user)
            .await
            .map_or(0, |a| a.credits)
    }

    pub async fn subdomains(&self, user: &str) -> Vec<String> {
        self.state()
            .subdomain_service
            .owned_subdomains(user)
            .await
    }
}

pub fn message(user: &str, kind: ChannelKind, channel: &str, content: &str) -> InboundMessage {
    InboundMessage {
        author_id: user.to_string(),
        from_self: false,
        channel_id: channel.to_string(),
        channel_kind: kind,
        content: content.to_string(),
    }
}
