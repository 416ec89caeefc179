//! 私信中的交互式 DNS 记录管理会话

mod engine;
pub mod replies;
mod state;

pub use engine::{SessionEngine, Transition};
pub use state::{RecordDraft, SessionState};

use std::sync::Arc;

use crate::services::ServiceContext;
use crate::store::SessionStore;
use crate::types::Reply;

/// 开始会话的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginOutcome {
    /// 用户没有子域名，不创建会话
    NoSubdomains(Reply),
    /// 已安装会话，回复为子域名选择菜单
    Started(Reply),
}

/// 会话管理器
///
/// 每个用户最多一个会话；同一用户的输入按到达顺序逐条处理。
pub struct SessionManager {
    ctx: Arc<ServiceContext>,
    engine: SessionEngine,
    store: SessionStore,
}

impl SessionManager {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            engine: SessionEngine::new(Arc::clone(&ctx)),
            store: SessionStore::new(),
            ctx,
        }
    }

    /// 为用户开始（或重新开始）一个会话
    pub async fn begin(&self, user_id: &str) -> BeginOutcome {
        let domains = self
            .ctx
            .ledger
            .account(user_id)
            .await
            .map(|account| account.subdomains)
            .unwrap_or_default();

        if domains.is_empty() {
            return BeginOutcome::NoSubdomains(replies::no_subdomains());
        }

        let reply = replies::domain_menu(&domains, &self.ctx.settings);
        if self.store.contains(user_id).await {
            log::debug!("Replacing existing session for user {user_id}");
        }
        self.store
            .install(user_id, SessionState::SelectDomain { domains })
            .await;
        log::info!("Started record session for user {user_id}");
        BeginOutcome::Started(reply)
    }

    /// 结束用户的会话（DM 无法送达时使用）
    pub async fn end(&self, user_id: &str) -> bool {
        self.store.remove(user_id).await
    }

    pub async fn has_session(&self, user_id: &str) -> bool {
        self.store.contains(user_id).await
    }

    pub async fn active_sessions(&self) -> usize {
        self.store.len().await
    }

    /// 处理一条私信
    ///
    /// 用户没有会话（或会话已在排队期间结束）时返回 `None`。
    pub async fn handle(&self, user_id: &str, input: &str) -> Option<Reply> {
        let slot = self.store.slot(user_id).await?;
        let mut guard = slot.lock().await;
        let state = guard.take()?;
        let from = state.name();

        let transition = self.engine.step(state, input).await;
        match transition {
            Transition::Advance(next, reply) | Transition::Retry(next, reply) => {
                log::debug!("Session {user_id}: {from} -> {}", next.name());
                *guard = Some(next);
                Some(reply)
            }
            Transition::Complete(reply) => {
                log::debug!("Session {user_id}: {from} -> done");
                self.store.remove_if_same(user_id, &slot).await;
                Some(reply)
            }
            Transition::Abort(reply) => {
                log::warn!("Session {user_id} aborted in {from}");
                self.store.remove_if_same(user_id, &slot).await;
                Some(reply)
            }
        }
    }
}
