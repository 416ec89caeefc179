//! Platform adapters for the bot binary.

mod console_gateway;
mod json_ledger_repository;

pub use console_gateway::ConsoleGateway;
pub use json_ledger_repository::JsonLedgerRepository;
