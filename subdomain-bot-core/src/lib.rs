//! Subdomain Bot Core Library
//!
//! Platform-independent business logic for the subdomain bot:
//! - Credit ledger with write-through persistence
//! - Subdomain purchase and administrative removal (Subdomain Service)
//! - Per-user conversational DNS record management (Session Manager)
//!
//! Storage and chat platforms are abstracted through traits
//! ([`LedgerRepository`], [`MessagingGateway`]); DNS access goes through
//! the [`DnsProvider`] trait from `subdomain-bot-provider`.

pub mod error;
pub mod services;
pub mod session;
pub mod store;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{BotSettings, ServiceContext, SubdomainService};
pub use session::{BeginOutcome, SessionManager};
pub use store::LedgerStore;
pub use traits::{DnsProvider, LedgerRepository, MessagingGateway};
