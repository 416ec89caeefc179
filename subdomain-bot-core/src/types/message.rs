use serde::{Deserialize, Serialize};

/// 消息来源频道类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// 私信
    Direct,
    /// 群组频道
    Group,
}

/// 网关投递的一条入站消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// 发送者 ID
    pub author_id: String,
    /// 是否由机器人自身发出
    #[serde(default)]
    pub from_self: bool,
    /// 来源频道 ID
    pub channel_id: String,
    /// 频道类型
    pub channel_kind: ChannelKind,
    /// 原始文本
    pub content: String,
}

impl InboundMessage {
    pub fn is_direct(&self) -> bool {
        self.channel_kind == ChannelKind::Direct
    }
}

/// 发起操作的用户及其权限
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
        }
    }
}
