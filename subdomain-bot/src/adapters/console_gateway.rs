//! Line-oriented console gateway
//!
//! Stands in for a chat platform: each stdin line is one inbound message of
//! the form `<user> <dm|#channel> <text>`, and replies are rendered as plain
//! text on stdout.

use std::collections::HashSet;

use async_trait::async_trait;
use subdomain_bot_core::error::{CoreError, CoreResult};
use subdomain_bot_core::traits::MessagingGateway;
use subdomain_bot_core::types::{ChannelKind, InboundMessage, Reply, Tone};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Console-backed messaging gateway.
pub struct ConsoleGateway {
    administrators: HashSet<String>,
    stdout: Mutex<tokio::io::Stdout>,
}

impl ConsoleGateway {
    #[must_use]
    pub fn new(administrators: impl IntoIterator<Item = String>) -> Self {
        Self {
            administrators: administrators.into_iter().collect(),
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }

    /// Parse one input line into an inbound message.
    ///
    /// Direct messages use the author's ID as the channel ID.
    pub fn parse_line(line: &str) -> Option<InboundMessage> {
        let mut parts = line.trim().splitn(3, char::is_whitespace);
        let author = parts.next().filter(|s| !s.is_empty())?;
        let target = parts.next()?;
        let content = parts.next().unwrap_or_default().trim().to_string();

        let (channel_id, channel_kind) = if target.eq_ignore_ascii_case("dm") {
            (author.to_string(), ChannelKind::Direct)
        } else {
            let channel = target.strip_prefix('#')?;
            if channel.is_empty() {
                return None;
            }
            (channel.to_string(), ChannelKind::Group)
        };

        Some(InboundMessage {
            author_id: author.to_string(),
            from_self: false,
            channel_id,
            channel_kind,
            content,
        })
    }

    /// Render a reply as plain text.
    pub fn render(reply: &Reply) -> String {
        let marker = match reply.tone {
            Tone::Success => "[ok]",
            Tone::Error => "[error]",
            Tone::Info => "[info]",
            Tone::Warning => "[warn]",
        };
        let mut out = format!("{marker} {}", reply.title);
        for line in reply.description.lines() {
            out.push_str("\n  ");
            out.push_str(line);
        }
        for field in &reply.fields {
            out.push_str("\n  * ");
            out.push_str(&field.name);
            for line in field.value.lines() {
                out.push_str("\n      ");
                out.push_str(line);
            }
        }
        if let Some(footer) = &reply.footer {
            out.push_str("\n  (");
            out.push_str(footer);
            out.push(')');
        }
        out
    }

    async fn write(&self, header: &str, reply: &Reply) -> CoreResult<()> {
        let text = format!("{header}\n{}\n", Self::render(reply));
        let mut stdout = self.stdout.lock().await;
        stdout
            .write_all(text.as_bytes())
            .await
            .map_err(|e| CoreError::Gateway(format!("Failed to write to stdout: {e}")))?;
        stdout
            .flush()
            .await
            .map_err(|e| CoreError::Gateway(format!("Failed to flush stdout: {e}")))
    }
}

#[async_trait]
impl MessagingGateway for ConsoleGateway {
    async fn send_direct(&self, user_id: &str, reply: &Reply) -> CoreResult<()> {
        self.write(&format!("-> dm @{user_id}"), reply).await
    }

    async fn send_channel(&self, channel_id: &str, reply: &Reply) -> CoreResult<()> {
        self.write(&format!("-> #{channel_id}"), reply).await
    }

    async fn resolve_user(&self, mention: &str) -> Option<String> {
        let id = mention.trim().trim_start_matches('@');
        (!id.is_empty() && !id.contains(char::is_whitespace)).then(|| id.to_string())
    }

    async fn is_administrator(&self, user_id: &str, _channel_id: &str) -> bool {
        self.administrators.contains(user_id)
    }
}
