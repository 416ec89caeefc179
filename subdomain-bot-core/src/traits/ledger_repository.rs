//! Ledger persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Ledger;

/// 账本持久化仓库 Trait
///
/// Platform implementation:
/// - `JsonLedgerRepository` (single JSON document on disk)
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// 读取整个账本
    ///
    /// 存储不存在时返回 `Ok(None)`；内容无法解析时返回
    /// `CoreError::SerializationError`。
    async fn load(&self) -> CoreResult<Option<Ledger>>;

    /// 覆盖保存整个账本
    async fn save(&self, ledger: &Ledger) -> CoreResult<()>;
}
