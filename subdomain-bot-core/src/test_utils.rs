//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use subdomain_bot_provider::{ProviderError, Result as ProviderResult};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{BotSettings, ServiceContext};
use crate::store::LedgerStore;
use crate::traits::{DnsProvider, LedgerRepository, MessagingGateway};
use crate::types::{
    CreateDnsRecordRequest, DnsRecord, DnsRecordType, Ledger, Reply, TTL_AUTO,
    UpdateDnsRecordRequest, UserAccount,
};

pub fn provider_error(message: &str) -> ProviderError {
    ProviderError::Unknown {
        provider: "mock".to_string(),
        raw_code: None,
        raw_message: message.to_string(),
    }
}

// ===== MockDnsProvider =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// 内存中的 zone
pub struct MockDnsProvider {
    records: RwLock<Vec<DnsRecord>>,
    next_id: RwLock<u64>,
    failures: RwLock<HashMap<MockOp, ProviderError>>,
    calls: RwLock<HashMap<MockOp, usize>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: RwLock::new(1),
            failures: RwLock::new(HashMap::new()),
            calls: RwLock::new(HashMap::new()),
        }
    }

    /// 设置（或清除）某个操作的失败
    pub async fn fail(&self, op: MockOp, err: Option<ProviderError>) {
        let mut failures = self.failures.write().await;
        match err {
            Some(err) => failures.insert(op, err),
            None => failures.remove(&op),
        };
    }

    pub async fn call_count(&self, op: MockOp) -> usize {
        self.calls.read().await.get(&op).copied().unwrap_or(0)
    }

    pub async fn records(&self) -> Vec<DnsRecord> {
        self.records.read().await.clone()
    }

    /// 直接放入一条记录，返回其 ID
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

    async fn enter(&self, op: MockOp) -> ProviderResult<()> {
        *self.calls.write().await.entry(op).or_insert(0) += 1;
        match self.failures.read().await.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found(record_id: &str) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: "mock".to_string(),
            record_id: record_id.to_string(),
            raw_message: None,
        }
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn list_records(&self) -> ProviderResult<Vec<DnsRecord>> {
        self.enter(MockOp::List).await?;
        Ok(self.records().await)
    }

    async fn get_record(&self, record_id: &str) -> ProviderResult<DnsRecord> {
        self.enter(MockOp::Get).await?;
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or_else(|| Self::not_found(record_id))
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> ProviderResult<DnsRecord> {
        self.enter(MockOp::Create).await?;
        let id = self.allocate_id().await;
        let record = DnsRecord {
            id,
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
        self.enter(MockOp::Update).await?;
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Self::not_found(record_id))?;
        record.record_type = req.record_type.clone();
        record.name = req.name.clone();
        record.content = req.content.clone();
        record.ttl = req.ttl;
        record.proxied = req.proxied;
        record.priority = req.priority;
        Ok(record.clone())
    }

    async fn delete_record(&self, record_id: &str) -> ProviderResult<()> {
        self.enter(MockOp::Delete).await?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Self::not_found(record_id));
        }
        Ok(())
    }
}

// ===== MockLedgerRepository =====

pub struct MockLedgerRepository {
    stored: RwLock<Option<Ledger>>,
    /// 如果 Some，load 时返回此错误（模拟损坏的账本文件）
    load_error: RwLock<Option<String>>,
    /// 如果 Some，save 时返回此错误
    save_error: RwLock<Option<String>>,
    save_count: RwLock<usize>,
}

impl MockLedgerRepository {
    pub fn new() -> Self {
        Self {
            stored: RwLock::new(None),
            load_error: RwLock::new(None),
            save_error: RwLock::new(None),
            save_count: RwLock::new(0),
        }
    }

    pub async fn set_load_error(&self, err: Option<String>) {
        *self.load_error.write().await = err;
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub async fn saved(&self) -> Option<Ledger> {
        self.stored.read().await.clone()
    }

    pub async fn save_count(&self) -> usize {
        *self.save_count.read().await
    }
}

#[async_trait]
impl LedgerRepository for MockLedgerRepository {
    async fn load(&self) -> CoreResult<Option<Ledger>> {
        if let Some(ref msg) = *self.load_error.read().await {
            return Err(CoreError::SerializationError(msg.clone()));
        }
        Ok(self.stored.read().await.clone())
    }

    async fn save(&self, ledger: &Ledger) -> CoreResult<()> {
        *self.save_count.write().await += 1;
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        *self.stored.write().await = Some(ledger.clone());
        Ok(())
    }
}

// ===== RecordingGateway =====

/// 记录所有发出的回复
pub struct RecordingGateway {
    direct: RwLock<Vec<(String, Reply)>>,
    channel: RwLock<Vec<(String, Reply)>>,
    admins: RwLock<HashSet<String>>,
    unreachable: RwLock<HashSet<String>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            direct: RwLock::new(Vec::new()),
            channel: RwLock::new(Vec::new()),
            admins: RwLock::new(HashSet::new()),
            unreachable: RwLock::new(HashSet::new()),
        }
    }

    pub async fn add_admin(&self, user_id: &str) {
        self.admins.write().await.insert(user_id.to_string());
    }

    /// 之后发给该用户的私信都会失败
    pub async fn block_direct(&self, user_id: &str) {
        self.unreachable.write().await.insert(user_id.to_string());
    }

    pub async fn direct_messages(&self, user_id: &str) -> Vec<Reply> {
        self.direct
            .read()
            .await
            .iter()
            .filter(|(to, _)| to == user_id)
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    pub async fn channel_messages(&self, channel_id: &str) -> Vec<Reply> {
        self.channel
            .read()
            .await
            .iter()
            .filter(|(to, _)| to == channel_id)
            .map(|(_, reply)| reply.clone())
            .collect()
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
        (!id.is_empty()).then(|| id.to_string())
    }

    async fn is_administrator(&self, user_id: &str, _channel_id: &str) -> bool {
        self.admins.read().await.contains(user_id)
    }
}

// ===== TestHarness =====

/// 一套装配好的 mock 依赖，基础域名默认为 `example.com`
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub provider: Arc<MockDnsProvider>,
    pub repository: Arc<MockLedgerRepository>,
    pub gateway: Arc<RecordingGateway>,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_base_domain("example.com").await
    }

    pub async fn with_base_domain(base_domain: &str) -> Self {
        let provider = Arc::new(MockDnsProvider::new());
        let repository = Arc::new(MockLedgerRepository::new());
        let gateway = Arc::new(RecordingGateway::new());
        let ledger = Arc::new(LedgerStore::load(repository.clone()).await);

        let ctx = Arc::new(ServiceContext::new(
            provider.clone(),
            ledger,
            gateway.clone(),
            BotSettings::new(base_domain),
        ));

        Self {
            ctx,
            provider,
            repository,
            gateway,
        }
    }

    pub async fn seed_account(&self, user_id: &str, credits: u64, subdomains: &[&str]) {
        let mut tx = self.ctx.ledger.begin().await;
        let account = tx.account_mut(user_id);
        account.credits = credits;
        account.subdomains = subdomains.iter().map(ToString::to_string).collect();
        tx.commit().await;
    }

    /// 当前账户（不存在时为默认值）
    pub async fn account(&self, user_id: &str) -> UserAccount {
        self.ctx
            .ledger
            .account(user_id)
            .await
            .unwrap_or_default()
    }
}
