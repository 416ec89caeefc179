//! Storage and platform abstraction trait definitions

mod ledger_repository;
mod messaging_gateway;

pub use ledger_repository::LedgerRepository;
pub use messaging_gateway::MessagingGateway;
pub use subdomain_bot_provider::DnsProvider;
