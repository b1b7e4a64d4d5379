use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use topup_engine::{
    db_types::{Link, Resolution},
    events::EventProducers,
    AccessApi,
    LinkApi,
    OrderFlowApi,
    OrderFlowError,
    TopupDatabase,
};

use crate::bot::commands::{BotCommand, CommandLine, HELP_TEXT};

/// How many orders `/orders` lists.
pub const RECENT_ORDERS_LIMIT: usize = 10;

/// Decides who may use the admin commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminPolicy {
    admin_id: Option<i64>,
}

impl AdminPolicy {
    pub fn new(admin_id: Option<i64>) -> Self {
        Self { admin_id }
    }

    pub fn is_admin(&self, caller_id: i64) -> bool {
        self.admin_id == Some(caller_id)
    }
}

/// A message the bot should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
}

impl OutgoingMessage {
    pub fn new<S: Into<String>>(chat_id: i64, text: S) -> Self {
        Self { chat_id, text: text.into() }
    }
}

/// Turns bot commands into engine calls, and engine results into replies.
///
/// The handler never talks to Telegram itself. [`CommandHandler::handle`] returns the messages to send: the reply to
/// the caller first, then (for `/genlink` on behalf of someone else) a copy of the link for the target user.
pub struct CommandHandler<B> {
    links: LinkApi<B>,
    orders: OrderFlowApi<B>,
    access: AccessApi<B>,
    policy: AdminPolicy,
    base_url: String,
}

impl<B> Debug for CommandHandler<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CommandHandler({:?}, {})", self.policy, self.base_url)
    }
}

impl<B: Clone> CommandHandler<B> {
    pub fn new(db: B, producers: EventProducers, policy: AdminPolicy, base_url: &str) -> Self {
        Self {
            links: LinkApi::new(db.clone()),
            orders: OrderFlowApi::new(db.clone(), producers),
            access: AccessApi::new(db),
            policy,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl<B: TopupDatabase> CommandHandler<B> {
    /// Handles one text message from `caller_id`, sent in `chat_id`. Messages that are not bot commands produce no
    /// output.
    pub async fn handle(&self, chat_id: i64, caller_id: i64, text: &str) -> Vec<OutgoingMessage> {
        let Some(line) = CommandLine::parse(text) else {
            trace!("🤖️ Ignoring non-command message from {caller_id}");
            return Vec::new();
        };
        debug!("🤖️ {:?} from {caller_id}", line.kind);
        if line.kind.admin_only() && !self.policy.is_admin(caller_id) {
            info!("🤖️ Refused {:?} from non-admin {caller_id}", line.kind);
            return vec![OutgoingMessage::new(chat_id, refusal(&line))];
        }
        let command = match BotCommand::try_from(line) {
            Ok(c) => c,
            Err(e) => return vec![OutgoingMessage::new(chat_id, e.to_string())],
        };
        match command {
            BotCommand::Start => vec![OutgoingMessage::new(chat_id, "👋 Welcome. Admin: /help for commands.")],
            BotCommand::Help => vec![OutgoingMessage::new(chat_id, HELP_TEXT)],
            BotCommand::Approve { user_id, period } => {
                vec![OutgoingMessage::new(chat_id, self.approve(user_id, &period).await)]
            },
            BotCommand::Revoke { user_id } => vec![OutgoingMessage::new(chat_id, self.revoke(user_id).await)],
            BotCommand::GenLink { diamonds, target, period } => {
                self.genlink(chat_id, caller_id, diamonds, target, period.as_deref()).await
            },
            BotCommand::Confirm { order_id, fail } => {
                let outcome = if fail { Resolution::Failed } else { Resolution::Confirmed };
                let reply = match self.orders.resolve_order(&order_id, outcome, None).await {
                    Ok(Some(_)) => format!("Order {order_id} marked {outcome}"),
                    Ok(None) => "Order not found".to_string(),
                    Err(e @ OrderFlowError::OrderAlreadyResolved(_)) => e.to_string(),
                    Err(e) => format!("Error: {e}"),
                };
                vec![OutgoingMessage::new(chat_id, reply)]
            },
            BotCommand::Orders => vec![OutgoingMessage::new(chat_id, self.list_orders().await)],
        }
    }

    async fn approve(&self, user_id: i64, period: &str) -> String {
        match self.access.grant(user_id, Some(period)).await {
            Ok(_) => format!("✅ Granted access to {user_id} for {period}"),
            Err(e) => format!("Error: {e}"),
        }
    }

    async fn revoke(&self, user_id: i64) -> String {
        match self.access.revoke(user_id).await {
            Ok(true) => "✅ Revoked".to_string(),
            Ok(false) => "❌ Not found".to_string(),
            Err(e) => format!("Error: {e}"),
        }
    }

    async fn genlink(
        &self,
        chat_id: i64,
        caller_id: i64,
        diamonds: u32,
        target: Option<i64>,
        period: Option<&str>,
    ) -> Vec<OutgoingMessage> {
        let is_admin = self.policy.is_admin(caller_id);
        let target = target.unwrap_or(caller_id);
        if target != caller_id && !is_admin {
            return vec![OutgoingMessage::new(
                chat_id,
                "⛔ You can only generate links for yourself. Admin can generate for others.",
            )];
        }
        if !is_admin {
            match self.access.is_allowed(caller_id).await {
                Ok(true) => {},
                Ok(false) => {
                    return vec![OutgoingMessage::new(
                        chat_id,
                        "⛔ You are not allowed to generate links. Ask admin to /approve you.",
                    )]
                },
                Err(e) => return vec![OutgoingMessage::new(chat_id, format!("Error: {e}"))],
            }
        }
        let link = match self.links.issue_link(target, diamonds, period).await {
            Ok(link) => link,
            Err(e) => return vec![OutgoingMessage::new(chat_id, format!("Error: {e}"))],
        };
        let url = self.redeem_url(&link);
        let expires = format_expiry(link.expire_at);
        let reply = format!("🔗 Link generated for user {target}:\n{url}\nExpires: {expires}");
        let mut messages = vec![OutgoingMessage::new(chat_id, reply)];
        if target != caller_id {
            messages.push(OutgoingMessage::new(
                target,
                format!("🔗 Admin created a redeem link for you:\n{url}\nExpires: {expires}"),
            ));
        }
        messages
    }

    async fn list_orders(&self) -> String {
        let orders = match self.orders.recent_orders(RECENT_ORDERS_LIMIT).await {
            Ok(orders) => orders,
            Err(e) => return format!("Error: {e}"),
        };
        if orders.is_empty() {
            return "No orders yet.".to_string();
        }
        orders.iter().fold("Recent orders:\n".to_string(), |mut text, o| {
            text.push_str(&format!("{} | {}d | {} | {}\n", o.id, o.diamonds, o.amount, o.status));
            text
        })
    }

    pub fn redeem_url(&self, link: &Link) -> String {
        format!("{}/redeem/{}", self.base_url, link.token)
    }
}

fn refusal(line: &CommandLine) -> &'static str {
    use crate::bot::commands::CommandKind::*;
    match line.kind {
        Approve => "⛔ Only admin can approve users.",
        Revoke => "⛔ Only admin can revoke users.",
        Confirm => "⛔ Only admin can confirm orders.",
        Orders => "⛔ Only admin may view orders.",
        Start | Help | GenLink => "⛔ Not allowed.",
    }
}

fn format_expiry(expire_at: Option<DateTime<Utc>>) -> String {
    expire_at.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()).unwrap_or_else(|| "no expiry".to_string())
}
