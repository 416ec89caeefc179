//! Subdomain bot entry point
//!
//! Runs the bot against the console gateway: each stdin line is one inbound
//! chat message (`<user> <dm|#channel> <text>`), replies are printed to
//! stdout and logs go to stderr.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use subdomain_bot::adapters::{ConsoleGateway, JsonLedgerRepository};
use subdomain_bot::config::BotConfig;
use subdomain_bot::{AppStateBuilder, Dispatcher};
use subdomain_bot_provider::CloudflareProvider;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries replies, logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = BotConfig::load()?;
    tracing::info!(
        "Starting subdomain bot for {} (prefix '{}')",
        config.base_domain,
        config.command_prefix
    );

    let provider = CloudflareProvider::new(
        config.cloudflare_auth()?,
        config.zone_id.clone(),
        config.timeouts(),
    )
    .context("Failed to create Cloudflare provider")?;
    let repository = JsonLedgerRepository::new(config.data_file.clone());
    tracing::info!("Ledger file: {}", repository.path().display());
    let gateway = ConsoleGateway::new(config.administrators.clone());

    let state = AppStateBuilder::new()
        .provider(Arc::new(provider))
        .ledger_repository(Arc::new(repository))
        .gateway(Arc::new(gateway))
        .settings(config.settings())
        .build()
        .await
        .context("Failed to initialize application state")?;

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(state), config.command_prefix));
    tracing::info!("Ready, reading messages from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(message) = ConsoleGateway::parse_line(&line) else {
            tracing::warn!("Ignoring malformed input line: {line}");
            continue;
        };
        dispatcher.submit(message).await;
    }

    tracing::info!("stdin closed, finishing queued messages");
    dispatcher.drain().await;
    Ok(())
}
