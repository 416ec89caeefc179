//! Bot configuration
//!
//! Loaded from a JSON file (path from `SUBDOMAIN_BOT_CONFIG`, default
//! `config.json`; a missing file means all defaults) and then overridden by
//! environment variables. Secrets are expected to come from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;
use subdomain_bot_core::services::{
    BotSettings, DEFAULT_PLACEHOLDER_ADDRESS, DEFAULT_RESET_CONFIRMATION_SECS,
    DEFAULT_SUBDOMAIN_COST,
};
use subdomain_bot_provider::{
    CloudflareAuth, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, HttpTimeouts,
};

const CONFIG_PATH_ENV: &str = "SUBDOMAIN_BOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Cloudflare credentials. Either an API token, or an email plus global API key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CloudflareConfig {
    pub api_token: Option<String>,
    pub email: Option<String>,
    pub api_key: Option<String>,
}

/// Top-level bot configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub command_prefix: String,
    pub base_domain: String,
    pub zone_id: String,
    pub cloudflare: CloudflareConfig,
    pub data_file: PathBuf,
    pub subdomain_cost: u64,
    pub placeholder_address: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub reset_confirmation_secs: u64,
    /// User IDs treated as administrators by the console gateway
    pub administrators: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: "%".to_string(),
            base_domain: String::new(),
            zone_id: String::new(),
            cloudflare: CloudflareConfig::default(),
            data_file: PathBuf::from("users.json"),
            subdomain_cost: DEFAULT_SUBDOMAIN_COST,
            placeholder_address: DEFAULT_PLACEHOLDER_ADDRESS.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            reset_confirmation_secs: DEFAULT_RESET_CONFIRMATION_SECS,
            administrators: Vec::new(),
        }
    }
}

impl BotConfig {
    /// Load from the configured file, apply environment overrides and validate.
    pub fn load() -> anyhow::Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("SUBDOMAIN_BOT_PREFIX") {
            self.command_prefix = v;
        }
        if let Some(v) = non_empty("SUBDOMAIN_BOT_BASE_DOMAIN") {
            self.base_domain = v;
        }
        if let Some(v) = non_empty("CLOUDFLARE_ZONE_ID") {
            self.zone_id = v;
        }
        if let Some(v) = non_empty("CLOUDFLARE_API_TOKEN") {
            self.cloudflare.api_token = Some(v);
        }
        if let Some(v) = non_empty("CLOUDFLARE_EMAIL") {
            self.cloudflare.email = Some(v);
        }
        if let Some(v) = non_empty("CLOUDFLARE_API_KEY") {
            self.cloudflare.api_key = Some(v);
        }
        if let Some(v) = non_empty("SUBDOMAIN_BOT_DATA_FILE") {
            self.data_file = PathBuf::from(v);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.command_prefix.trim().is_empty() {
            bail!("command_prefix must not be empty");
        }
        if self.base_domain.trim().is_empty() {
            bail!("base_domain is required (or set SUBDOMAIN_BOT_BASE_DOMAIN)");
        }
        if self.zone_id.trim().is_empty() {
            bail!("zone_id is required (or set CLOUDFLARE_ZONE_ID)");
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            bail!("timeouts must be greater than zero");
        }
        self.cloudflare_auth()?;
        Ok(())
    }

    /// Cloudflare auth method; the API token wins when both are configured.
    pub fn cloudflare_auth(&self) -> anyhow::Result<CloudflareAuth> {
        let cf = &self.cloudflare;
        if let Some(token) = &cf.api_token {
            if cf.api_key.is_some() {
                log::warn!("Both Cloudflare API token and global key configured, using the token");
            }
            return Ok(CloudflareAuth::ApiToken(token.clone()));
        }
        match (&cf.email, &cf.api_key) {
            (Some(email), Some(key)) => Ok(CloudflareAuth::GlobalKey {
                email: email.clone(),
                key: key.clone(),
            }),
            (None, Some(_)) => bail!("CLOUDFLARE_EMAIL is required with CLOUDFLARE_API_KEY"),
            _ => bail!(
                "Cloudflare credentials missing: set CLOUDFLARE_API_TOKEN, \
                 or CLOUDFLARE_EMAIL and CLOUDFLARE_API_KEY"
            ),
        }
    }

    pub fn timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn settings(&self) -> BotSettings {
        BotSettings {
            base_domain: self.base_domain.trim().to_string(),
            subdomain_cost: self.subdomain_cost,
            placeholder_address: self.placeholder_address.clone(),
            reset_confirmation_window: Duration::from_secs(self.reset_confirmation_secs),
        }
    }
}
