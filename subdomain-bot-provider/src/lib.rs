//! # subdomain-bot-provider
//!
//! Zone-scoped DNS record client used by the subdomain bot.
//!
//! A [`DnsProvider`] is bound to a single zone at construction time; every
//! operation lists, reads, creates, overwrites or deletes records inside it.
//! [`CloudflareProvider`] is the only backend.
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: Use rustls.
//! - **`native-tls`**: Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use subdomain_bot_provider::{
//!     CloudflareAuth, CloudflareProvider, CreateDnsRecordRequest, DnsProvider, DnsRecordType,
//!     HttpTimeouts,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = CloudflareProvider::new(
//!         CloudflareAuth::ApiToken("your-token".to_string()),
//!         "your-zone-id",
//!         HttpTimeouts::default(),
//!     )?;
//!
//!     let request =
//!         CreateDnsRecordRequest::auto(DnsRecordType::A, "foo.example.com", "1.2.3.4");
//!     let record = provider.create_record(&request).await?;
//!
//!     for r in provider.list_records().await? {
//!         println!("{} {} -> {}", r.name, r.record_type, r.content);
//!     }
//!
//!     provider.delete_record(&record.id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`]: authentication failed
//! - [`ProviderError::RecordNotFound`]: DNS record not found
//! - [`ProviderError::RateLimited`]: API rate limit exceeded
//! - [`ProviderError::NetworkError`] / [`ProviderError::Timeout`]: provider unreachable
//!
//! Requests are never retried automatically.

mod error;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

// Re-export types
pub use types::{
    BatchDeleteFailure, BatchDeleteResult, CreateDnsRecordRequest, DnsRecord, DnsRecordType,
    TTL_AUTO, UpdateDnsRecordRequest,
};

pub use providers::{
    CloudflareAuth, CloudflareProvider, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, HttpTimeouts,
};

pub use utils::log_sanitizer::truncate_for_log;
