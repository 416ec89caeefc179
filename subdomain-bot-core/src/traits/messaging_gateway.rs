//! Chat platform abstract Trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Reply;

/// 消息网关 Trait
///
/// 负责把回复投递到用户私信或频道、解析用户提及以及查询管理员权限。
/// 核心层只通过它与聊天平台交互。
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// 发送私信
    async fn send_direct(&self, user_id: &str, reply: &Reply) -> CoreResult<()>;

    /// 发送到频道
    async fn send_channel(&self, channel_id: &str, reply: &Reply) -> CoreResult<()>;

    /// 将提及（如 `@alice`）解析为用户 ID
    async fn resolve_user(&self, mention: &str) -> Option<String>;

    /// 用户在来源频道所属群组中是否有管理员权限
    async fn is_administrator(&self, user_id: &str, channel_id: &str) -> bool;

    /// 在回复中引用用户的方式
    fn mention(&self, user_id: &str) -> String {
        format!("@{user_id}")
    }

    /// 与平台的当前延迟（未知时为 `None`）
    fn latency(&self) -> Option<Duration> {
        None
    }
}
