//! 类型定义模块

mod account;
mod message;
mod reply;

pub use account::{Ledger, UserAccount};
pub use message::{Actor, ChannelKind, InboundMessage};
pub use reply::{Reply, ReplyField, Tone};

// Re-export provider 库的公共类型
pub use subdomain_bot_provider::{
    BatchDeleteResult, CreateDnsRecordRequest, DnsRecord, DnsRecordType, TTL_AUTO,
    UpdateDnsRecordRequest,
};
