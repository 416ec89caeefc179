//! Inbound message routing
//!
//! Every inbound message goes through [`Dispatcher::dispatch`]:
//! 1. messages from the bot itself are dropped;
//! 2. if the author has a pending `reset_all` confirmation, the text is
//!    forwarded to it, and the exact token is consumed there;
//! 3. prefixed text is parsed and executed as a command;
//! 4. any other direct message feeds the author's record session, if any.
//!
//! [`Dispatcher::submit`] runs messages on one lane per author: a user's
//! messages are handled in order, different users never wait on each other.
//!
//! Handler errors are turned into replies here and never escape.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use subdomain_bot_core::error::CoreError;
use subdomain_bot_core::session::BeginOutcome;
use subdomain_bot_core::traits::MessagingGateway;
use subdomain_bot_core::types::{Actor, InboundMessage, Reply};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::AppState;
use crate::commands::{Command, ParseError};

/// Buffered messages per pending reset confirmation
const RESET_CHANNEL_CAPACITY: usize = 16;

fn permission_denied() -> Reply {
    Reply::error(
        "Permission Denied",
        "You don't have permission to use this command.",
    )
}

fn user_not_found(mention: &str) -> Reply {
    Reply::error("User Not Found", format!("Could not find user {mention}."))
}

/// Reply where `message` came from.
async fn deliver(gateway: &dyn MessagingGateway, message: &InboundMessage, reply: &Reply) {
    let result = if message.is_direct() {
        gateway.send_direct(&message.author_id, reply).await
    } else {
        gateway.send_channel(&message.channel_id, reply).await
    };
    if let Err(e) = result {
        log::warn!("Failed to deliver reply in {}: {e}", message.channel_id);
    }
}

/// A `reset_all` waiting for its token.
struct PendingReset {
    token: String,
    sender: mpsc::Sender<String>,
}

/// Worker handling one author's messages in order.
struct Lane {
    sender: mpsc::UnboundedSender<InboundMessage>,
    worker: JoinHandle<()>,
}

/// Routes inbound messages to commands and sessions.
pub struct Dispatcher {
    state: Arc<AppState>,
    prefix: String,
    pending_resets: Arc<Mutex<HashMap<String, PendingReset>>>,
    lanes: Mutex<HashMap<String, Lane>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(state: Arc<AppState>, prefix: impl Into<String>) -> Self {
        Self {
            state,
            prefix: prefix.into(),
            pending_resets: Arc::new(Mutex::new(HashMap::new())),
            lanes: Mutex::new(HashMap::new()),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    // ===== Lanes =====

    /// Queue `message` behind earlier messages from the same author.
    pub async fn submit(self: &Arc<Self>, message: InboundMessage) {
        let mut lanes = self.lanes.lock().await;
        let author = message.author_id.clone();
        let message = match lanes.get(&author) {
            Some(lane) => match lane.sender.send(message) {
                Ok(()) => return,
                Err(mpsc::error::SendError(message)) => {
                    log::warn!("Message lane of {author} stopped, restarting it");
                    message
                }
            },
            None => message,
        };

        let lane = self.open_lane();
        if lane.sender.send(message).is_err() {
            log::error!("Failed to queue message from {author}");
        }
        lanes.insert(author, lane);
    }

    fn open_lane(self: &Arc<Self>) -> Lane {
        let (sender, mut receiver) = mpsc::unbounded_channel::<InboundMessage>();
        let dispatcher: Weak<Self> = Arc::downgrade(self);
        let worker = tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                let Some(dispatcher) = dispatcher.upgrade() else {
                    break;
                };
                dispatcher.dispatch(message).await;
            }
        });
        Lane { sender, worker }
    }

    /// Finish every queued message, then close all lanes.
    pub async fn drain(&self) {
        let lanes = std::mem::take(&mut *self.lanes.lock().await);
        for (author, lane) in lanes {
            drop(lane.sender);
            if let Err(e) = lane.worker.await {
                log::error!("Message lane of {author} failed: {e}");
            }
        }
    }

    /// Handle one inbound message.
    pub async fn dispatch(&self, message: InboundMessage) {
        if message.from_self {
            return;
        }

        if self.forward_to_pending_reset(&message).await {
            return;
        }

        match Command::parse(&self.prefix, &message.content) {
            Some(Ok(command)) => {
                log::info!(
                    "User {} invoked {command:?} in {}",
                    message.author_id,
                    message.channel_id
                );
                self.execute(&message, command).await;
            }
            Some(Err(ParseError::Unknown(name))) => {
                let reply = Reply::error(
                    "Unknown Command",
                    format!(
                        "Unknown command `{name}`. Type `{}commands` for a list of commands.",
                        self.prefix
                    ),
                );
                self.respond(&message, &reply).await;
            }
            Some(Err(ParseError::Usage(usage))) => {
                let reply = Reply::error("Invalid Usage", format!("Usage: `{}{usage}`", self.prefix));
                self.respond(&message, &reply).await;
            }
            None if message.is_direct() => {
                if let Some(reply) = self
                    .state
                    .sessions
                    .handle(&message.author_id, &message.content)
                    .await
                {
                    self.send_direct(&message.author_id, &reply).await;
                }
            }
            None => {}
        }
    }

    // ===== Delivery =====

    async fn respond(&self, message: &InboundMessage, reply: &Reply) {
        deliver(self.state.ctx.gateway.as_ref(), message, reply).await;
    }

    async fn send_direct(&self, user_id: &str, reply: &Reply) -> bool {
        match self.state.ctx.gateway.send_direct(user_id, reply).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to DM user {user_id}: {e}");
                false
            }
        }
    }

    async fn actor(&self, message: &InboundMessage) -> Actor {
        let is_admin = self
            .state
            .ctx
            .gateway
            .is_administrator(&message.author_id, &message.channel_id)
            .await;
        Actor::new(message.author_id.clone(), is_admin)
    }

    // ===== Commands =====

    async fn execute(&self, message: &InboundMessage, command: Command) {
        let reply = match command {
            Command::Ping => Some(self.ping(message)),
            Command::Commands => Some(self.help(message)),
            Command::Balance => Some(self.balance(message).await),
            Command::AddCredits { user, amount } => {
                Some(self.add_credits(message, &user, amount).await)
            }
            Command::RemoveCredits { user, amount } => {
                Some(self.remove_credits(message, &user, amount).await)
            }
            Command::CreateSubdomain { name } => Some(self.create_subdomain(message, &name).await),
            Command::RemoveSubdomain { name, user } => {
                Some(self.remove_subdomain(message, &name, user.as_deref()).await)
            }
            Command::ListSubdomains => Some(self.list_subdomains(message).await),
            Command::Records => {
                self.records(message).await;
                None
            }
            Command::ResetAll => {
                self.reset_all(message).await;
                None
            }
        };

        if let Some(reply) = reply {
            self.respond(message, &reply).await;
        }
    }

    fn requested_by(&self, message: &InboundMessage) -> String {
        format!(
            "Requested by {}",
            self.state.ctx.gateway.mention(&message.author_id)
        )
    }

    fn ping(&self, message: &InboundMessage) -> Reply {
        let description = match self.state.ctx.gateway.latency() {
            Some(latency) => format!("Bot latency: {}ms", latency.as_millis()),
            None => "Bot is responding.".to_string(),
        };
        Reply::info("Pong!", description).footer(self.requested_by(message))
    }

    fn help(&self, message: &InboundMessage) -> Reply {
        let p = &self.prefix;
        let cost = self.state.ctx.settings.subdomain_cost;
        Reply::info("Bot Commands", "Here's what you can do with this bot:")
            .field(
                "General",
                format!(
                    "`{p}ping` - Check if the bot is responding\n\
                     `{p}balance` - Check your credit balance"
                ),
            )
            .field(
                "Domain Management",
                format!(
                    "`{p}create_subdomain name` - Create a subdomain (costs {cost} credits)\n\
                     `{p}list_subdomains` - List all your subdomains\n\
                     `{p}records` - Interactive DNS record management"
                ),
            )
            .field(
                "Admin Commands",
                format!(
                    "`{p}add_credits @user amount` - Add credits to a user\n\
                     `{p}remove_subdomain name @user` - Remove a user's subdomain\n\
                     `{p}remove_credits @user amount` - Remove credits from a user\n\
                     `{p}reset_all` - Reset all user data (requires confirmation string)"
                ),
            )
            .footer(self.requested_by(message))
    }

    async fn balance(&self, message: &InboundMessage) -> Reply {
        let account = self
            .state
            .subdomain_service
            .get_or_create_account(&message.author_id)
            .await;
        Reply::info(
            "Account Balance",
            format!("You currently have {} credits.", account.credits),
        )
        .footer(self.requested_by(message))
    }

    async fn add_credits(&self, message: &InboundMessage, mention: &str, amount: u64) -> Reply {
        if !self.actor(message).await.is_admin {
            return permission_denied();
        }
        let Some(user_id) = self.state.ctx.gateway.resolve_user(mention).await else {
            return user_not_found(mention);
        };
        let Ok(delta) = i64::try_from(amount) else {
            return Reply::error("Invalid Amount", "Amount is too large.");
        };

        let display = self.state.ctx.gateway.mention(&user_id);
        match self
            .state
            .subdomain_service
            .adjust_credits(&user_id, delta)
            .await
        {
            Ok(balance) => Reply::success(
                "Credits Added",
                format!("Added {amount} credits to {display}.\nThey now have {balance} credits."),
            ),
            Err(e) => {
                log::error!("Failed to add credits to {user_id}: {e}");
                Reply::error("Error", "An error occurred while adding credits.")
            }
        }
    }

    async fn remove_credits(&self, message: &InboundMessage, mention: &str, amount: u64) -> Reply {
        if !self.actor(message).await.is_admin {
            return permission_denied();
        }
        let Some(user_id) = self.state.ctx.gateway.resolve_user(mention).await else {
            return user_not_found(mention);
        };
        let Ok(delta) = i64::try_from(amount) else {
            return Reply::error("Invalid Amount", "Amount is too large.");
        };

        let display = self.state.ctx.gateway.mention(&user_id);
        match self
            .state
            .subdomain_service
            .adjust_credits(&user_id, -delta)
            .await
        {
            Ok(balance) => Reply::success(
                "Credits Removed",
                format!(
                    "Removed {amount} credits from {display}.\nThey now have {balance} credits."
                ),
            ),
            Err(CoreError::InsufficientCredits { .. }) => Reply::error(
                "Insufficient Credits",
                format!("{display} does not have enough credits to remove."),
            ),
            Err(e) => {
                log::error!("Failed to remove credits from {user_id}: {e}");
                Reply::error("Error", "An error occurred while removing credits.")
            }
        }
    }

    async fn create_subdomain(&self, message: &InboundMessage, name: &str) -> Reply {
        match self
            .state
            .subdomain_service
            .create_subdomain(&message.author_id, name)
            .await
        {
            Ok(created) => Reply::success(
                "Subdomain Created. Remember to delete the example record!",
                format!(
                    "Successfully created subdomain {}\nDefault IP: {}",
                    created.fqdn, created.address
                ),
            )
            .field(
                "Next Steps",
                format!(
                    "Use `{}records` to manage DNS records for this subdomain.",
                    self.prefix
                ),
            )
            .footer(format!(
                "Created by {}",
                self.state.ctx.gateway.mention(&message.author_id)
            )),
            Err(e) => {
                if e.is_expected() {
                    log::warn!("create_subdomain {name} rejected: {e}");
                } else {
                    log::error!("create_subdomain {name} failed: {e}");
                }
                Self::create_error_reply(&e)
            }
        }
    }

    fn create_error_reply(e: &CoreError) -> Reply {
        match e {
            CoreError::InvalidName(_) => Reply::error(
                "Invalid Name",
                "Invalid subdomain name. Use only alphanumeric characters and hyphens.",
            ),
            CoreError::InsufficientCredits {
                required,
                available,
            } => Reply::error(
                "Insufficient Credits",
                format!(
                    "You need {required} credits to create a subdomain. You currently have {available} credits."
                ),
            ),
            CoreError::AlreadyExists(fqdn) => {
                Reply::warning("Already Exists", format!("Subdomain {fqdn} already exists."))
            }
            CoreError::InvalidSubdomain(_) => Reply::error(
                "Invalid Subdomain",
                "You cannot create a subdomain on an existing subdomain or the root domain.",
            ),
            CoreError::ProviderUnavailable(detail) => Reply::error(
                "API Error",
                format!("Failed to connect to Cloudflare API. {detail}"),
            ),
            CoreError::Provider(err) => Reply::error(
                "Creation Failed",
                format!("Failed to create subdomain. API Error: {err}"),
            ),
            other => Reply::error("Error", format!("Error creating subdomain: {other}")),
        }
    }

    async fn remove_subdomain(
        &self,
        message: &InboundMessage,
        name: &str,
        mention: Option<&str>,
    ) -> Reply {
        let actor = self.actor(message).await;
        if !actor.is_admin {
            return permission_denied();
        }
        let target = match mention {
            Some(mention) => match self.state.ctx.gateway.resolve_user(mention).await {
                Some(user_id) => user_id,
                None => return user_not_found(mention),
            },
            None => message.author_id.clone(),
        };
        let display = self.state.ctx.gateway.mention(&target);

        match self
            .state
            .subdomain_service
            .remove_subdomain(&actor, &target, name)
            .await
        {
            Ok(report) if !report.found_remote_records() => Reply::warning(
                "Warning",
                format!(
                    "No DNS records found for {}, but removing from user's list.",
                    report.fqdn
                ),
            ),
            Ok(report) => {
                let reply = Reply::success(
                    "Subdomain Removed",
                    format!(
                        "Successfully removed subdomain {} from {display}.\nDeleted {} DNS records.",
                        report.fqdn, report.deleted
                    ),
                );
                let reply = if report.failed > 0 {
                    reply.field(
                        "Failed Deletions",
                        format!("{} record(s) could not be deleted.", report.failed),
                    )
                } else {
                    reply
                };
                reply.footer(format!(
                    "Action by {}",
                    self.state.ctx.gateway.mention(&actor.user_id)
                ))
            }
            Err(CoreError::NotFound(_)) => Reply::error(
                "Not Found",
                format!("Subdomain not found for {display}."),
            ),
            Err(CoreError::PermissionDenied(_)) => permission_denied(),
            Err(e @ (CoreError::ProviderUnavailable(_) | CoreError::Provider(_))) => {
                log::error!("remove_subdomain {name} failed: {e}");
                Reply::error(
                    "API Error",
                    format!("Failed to connect to Cloudflare API. {e}"),
                )
            }
            Err(e) => {
                log::error!("remove_subdomain {name} failed: {e}");
                Reply::error("Error", format!("Error removing subdomain: {e}"))
            }
        }
    }

    async fn list_subdomains(&self, message: &InboundMessage) -> Reply {
        let labels = self
            .state
            .subdomain_service
            .owned_subdomains(&message.author_id)
            .await;

        if labels.is_empty() {
            return Reply::info(
                "Your Subdomains",
                format!(
                    "You don't have any subdomains yet.\nUse `{}create_subdomain name` to create one.",
                    self.prefix
                ),
            );
        }

        let hint = format!("Use `{}records` to manage DNS records.", self.prefix);
        labels
            .iter()
            .fold(
                Reply::info(
                    "Your Subdomains",
                    format!("You have {} subdomain(s):", labels.len()),
                ),
                |reply, label| reply.field(self.state.ctx.settings.fqdn(label), hint.clone()),
            )
            .footer(self.requested_by(message))
    }

    /// Start a record-management session over DM.
    async fn records(&self, message: &InboundMessage) {
        let user_id = &message.author_id;

        if !message.is_direct() {
            let notice = Reply::info(
                "Check Your DMs",
                "I've sent you a private message to manage your DNS records.",
            );
            self.respond(message, &notice).await;
        }

        let delivered = match self.state.sessions.begin(user_id).await {
            BeginOutcome::NoSubdomains(reply) => self.send_direct(user_id, &reply).await,
            BeginOutcome::Started(reply) => {
                let delivered = self.send_direct(user_id, &reply).await;
                if !delivered {
                    self.state.sessions.end(user_id).await;
                }
                delivered
            }
        };

        if !delivered && !message.is_direct() {
            let reply = Reply::error(
                "DM Error",
                "I couldn't send you a direct message. Please make sure your privacy settings allow DMs from server members.",
            );
            self.respond(message, &reply).await;
        }
    }

    // ===== reset_all =====

    /// Pass the text on verbatim; `true` when it is the expected token.
    async fn forward_to_pending_reset(&self, message: &InboundMessage) -> bool {
        let pending = self.pending_resets.lock().await;
        let Some(reset) = pending.get(&message.author_id) else {
            return false;
        };
        if reset.sender.try_send(message.content.clone()).is_err() {
            log::debug!(
                "Dropped reset confirmation input from {}",
                message.author_id
            );
        }
        message.content == reset.token
    }

    /// Ask for the confirmation token and wait for it in the background.
    ///
    /// The receiver is registered before the token is sent, so an immediate
    /// echo is never missed. The outcome is posted where the command came from.
    async fn reset_all(&self, message: &InboundMessage) {
        let actor = self.actor(message).await;
        let Ok(challenge) = self.state.subdomain_service.reset_challenge(&actor) else {
            self.respond(message, &permission_denied()).await;
            return;
        };

        let (sender, mut receiver) = mpsc::channel(RESET_CHANNEL_CAPACITY);
        self.pending_resets
            .lock()
            .await
            .insert(
                actor.user_id.clone(),
                PendingReset {
                    token: challenge.token.clone(),
                    sender: sender.clone(),
                },
            );

        let prompt = Reply::warning(
            "Confirmation Required",
            format!(
                "To confirm resetting all user data, please type the following string:\n\n{}",
                challenge.token
            ),
        );
        self.respond(message, &prompt).await;
        log::warn!("User {} requested a full ledger reset", actor.user_id);

        let state = Arc::clone(&self.state);
        let pending_resets = Arc::clone(&self.pending_resets);
        let message = message.clone();
        tokio::spawn(async move {
            let result = state
                .subdomain_service
                .reset_all(&challenge, &mut receiver)
                .await;

            {
                let mut pending = pending_resets.lock().await;
                if pending
                    .get(&actor.user_id)
                    .is_some_and(|current| current.sender.same_channel(&sender))
                {
                    pending.remove(&actor.user_id);
                }
            }

            let reply = match result {
                Ok(_) => Reply::success(
                    "All User Data Reset",
                    "All user data has been successfully reset.",
                )
                .footer(format!(
                    "Action by {}",
                    state.ctx.gateway.mention(&actor.user_id)
                )),
                Err(CoreError::Timeout(_)) => {
                    Reply::error("Timeout", "Confirmation string not entered in time.")
                }
                Err(e) => {
                    log::error!("reset_all failed: {e}");
                    Reply::error("Error", "An error occurred while resetting all user data.")
                }
            };
            deliver(state.ctx.gateway.as_ref(), &message, &reply).await;
        });
    }
}
