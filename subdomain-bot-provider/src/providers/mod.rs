//! DNS Provider implementations

mod cloudflare;

pub use cloudflare::{
    CloudflareAuth, CloudflareProvider, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, HttpTimeouts,
};
