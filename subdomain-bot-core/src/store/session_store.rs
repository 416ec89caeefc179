//! 会话表

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::session::SessionState;

/// 单个用户的会话槽
///
/// 处理一步时持有槽锁，同一用户的消息因此串行处理。
/// 槽内为 `None` 表示会话已结束。
pub type SessionSlot = Arc<Mutex<Option<SessionState>>>;

/// 会话表：用户 ID → 会话槽
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为用户安装新会话，替换已有会话
    pub async fn install(&self, user_id: &str, state: SessionState) -> SessionSlot {
        let slot = Arc::new(Mutex::new(Some(state)));
        self.sessions
            .lock()
            .await
            .insert(user_id.to_string(), Arc::clone(&slot));
        slot
    }

    pub async fn slot(&self, user_id: &str) -> Option<SessionSlot> {
        self.sessions.lock().await.get(user_id).cloned()
    }

    pub async fn contains(&self, user_id: &str) -> bool {
        self.sessions.lock().await.contains_key(user_id)
    }

    /// 无条件移除用户的会话
    pub async fn remove(&self, user_id: &str) -> bool {
        self.sessions.lock().await.remove(user_id).is_some()
    }

    /// 仅当表中仍是同一个槽时移除
    ///
    /// 处理期间用户可能已开始新会话，旧步骤结束时不能把新会话删掉。
    pub async fn remove_if_same(&self, user_id: &str, slot: &SessionSlot) -> bool {
        let mut sessions = self.sessions.lock().await;
        if sessions
            .get(user_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            sessions.remove(user_id);
            true
        } else {
            false
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
