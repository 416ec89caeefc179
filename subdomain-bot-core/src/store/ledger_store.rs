//! 账本存储

use std::collections::HashSet;
use std::sync::{Arc, PoisonError};

use tokio::sync::{Mutex, MutexGuard};

use crate::traits::LedgerRepository;
use crate::types::{Ledger, UserAccount};

/// 账本存储
///
/// 内存中的账本是权威状态，每次修改后整体写回仓库（write-through）。
/// 所有读-改-写都必须在同一个 [`LedgerTransaction`] 内完成，
/// 事务持有全局互斥锁直到提交。事务内不做网络调用；
/// 跨 provider 调用的流程用 [`reserve`](Self::reserve) 占住标签。
pub struct LedgerStore {
    ledger: Mutex<Ledger>,
    repository: Arc<dyn LedgerRepository>,
    reserved: std::sync::Mutex<HashSet<String>>,
}

impl LedgerStore {
    /// 使用给定的初始账本创建
    pub fn new(repository: Arc<dyn LedgerRepository>, ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            repository,
            reserved: std::sync::Mutex::new(HashSet::new()),
        }
    }

    /// 从仓库加载账本
    ///
    /// 不存在时得到空账本；内容损坏时记录警告并得到空账本，不会失败。
    pub async fn load(repository: Arc<dyn LedgerRepository>) -> Self {
        let ledger = match repository.load().await {
            Ok(Some(ledger)) => {
                log::info!("Loaded ledger with {} account(s)", ledger.len());
                ledger
            }
            Ok(None) => {
                log::info!("No ledger found, starting with an empty one");
                Ledger::new()
            }
            Err(e) => {
                log::warn!("Failed to load ledger, starting with an empty one: {e}");
                Ledger::new()
            }
        };
        Self::new(repository, ledger)
    }

    /// 开始一个事务（获取全局锁）
    pub async fn begin(&self) -> LedgerTransaction<'_> {
        LedgerTransaction {
            ledger: self.ledger.lock().await,
            repository: self.repository.as_ref(),
            dirty: false,
        }
    }

    /// 只读查询单个账户（不会创建）
    pub async fn account(&self, user_id: &str) -> Option<UserAccount> {
        self.ledger.lock().await.get(user_id).cloned()
    }

    /// 当前账本的副本
    pub async fn snapshot(&self) -> Ledger {
        self.ledger.lock().await.clone()
    }

    /// 占住一个还未入账的标签，已被占用时返回 `None`
    ///
    /// 预留随返回值 drop 释放。
    pub fn reserve(&self, label: &str) -> Option<LabelReservation<'_>> {
        let mut reserved = self.reserved.lock().unwrap_or_else(PoisonError::into_inner);
        reserved.insert(label.to_string()).then(|| LabelReservation {
            store: self,
            label: label.to_string(),
        })
    }
}

/// 进行中的标签预留
pub struct LabelReservation<'a> {
    store: &'a LedgerStore,
    label: String,
}

impl Drop for LabelReservation<'_> {
    fn drop(&mut self) {
        self.store
            .reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.label);
    }
}

/// 账本事务
///
/// 持有账本锁；[`commit`](Self::commit) 在有修改时写回仓库。
/// 写回失败只记录日志，不回滚内存中的修改。
pub struct LedgerTransaction<'a> {
    ledger: MutexGuard<'a, Ledger>,
    repository: &'a dyn LedgerRepository,
    dirty: bool,
}

impl LedgerTransaction<'_> {
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn account(&self, user_id: &str) -> Option<&UserAccount> {
        self.ledger.get(user_id)
    }

    /// 获取可变账户，不存在时创建默认账户
    pub fn account_mut(&mut self, user_id: &str) -> &mut UserAccount {
        if !self.ledger.contains(user_id) {
            log::info!("Creating ledger account for user {user_id}");
        }
        self.dirty = true;
        self.ledger.entry(user_id)
    }

    /// 清空整个账本
    pub fn clear(&mut self) {
        *self.ledger = Ledger::new();
        self.dirty = true;
    }

    /// 提交：有修改时持久化
    pub async fn commit(self) {
        if !self.dirty {
            return;
        }
        if let Err(e) = self.repository.save(&self.ledger).await {
            log::error!("Failed to persist ledger, keeping in-memory state: {e}");
        }
    }
}
