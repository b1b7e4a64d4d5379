use futures::future::BoxFuture;
use log::*;
use topup_engine::{
    db_types::{Order, Resolution},
    events::{EventHandlers, EventHooks, OrderCreatedEvent, OrderResolvedEvent},
};

use crate::{
    config::TelegramConfig,
    data_objects::SocialProfile,
    telegram::{TelegramClient, TelegramError},
};

pub const NOTIFIER_EVENT_BUFFER_SIZE: usize = 25;

/// Delivers order notifications over Telegram.
///
/// New orders are announced to the admin (or to the order's owner when no admin is configured), followed by the
/// payment QR image if one is configured. Resolutions are announced to the order's owner. Social logins are only ever
/// reported to the admin.
///
/// Without a Telegram client, messages are written to the log instead. Delivery failures are logged and otherwise
/// ignored.
#[derive(Clone)]
pub struct Notifier {
    client: Option<TelegramClient>,
    admin_id: Option<i64>,
    payment_qr_url: Option<String>,
}

impl Notifier {
    pub fn new(client: Option<TelegramClient>, admin_id: Option<i64>, payment_qr_url: Option<String>) -> Self {
        Self { client, admin_id, payment_qr_url }
    }

    pub fn from_config(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = match &config.bot_token {
            Some(token) => Some(TelegramClient::new(token.clone(), config.poll_timeout)?),
            None => None,
        };
        Ok(Self::new(client, config.admin_id, config.payment_qr_url.clone()))
    }

    pub fn new_order_recipient(&self, order: &Order) -> i64 {
        self.admin_id.unwrap_or(order.owner_id)
    }

    pub async fn notify_order_created(&self, order: &Order) {
        let chat_id = self.new_order_recipient(order);
        self.send_text(chat_id, &order_created_message(order)).await;
        if let Some(url) = &self.payment_qr_url {
            let caption = format!("QR for order {}", order.id);
            self.send_photo(chat_id, url, &caption).await;
        }
    }

    pub async fn notify_order_resolved(&self, order: &Order, outcome: Resolution) {
        self.send_text(order.owner_id, &order_resolved_message(order, outcome)).await;
    }

    /// Forwards a social-login profile to the admin, followed by the profile photo when there is one.
    pub async fn notify_social_login(&self, profile: &SocialProfile) {
        let Some(admin) = self.admin_id else {
            warn!("📨️ {} login by {} not forwarded. No admin is configured.", profile.provider, profile.id);
            return;
        };
        self.send_text(admin, &social_login_message(profile)).await;
        if let Some(url) = &profile.photo_url {
            let caption = format!("{} user: {}", profile.provider, profile.display_handle());
            self.send_photo(admin, url, &caption).await;
        }
    }

    pub async fn send_text(&self, chat_id: i64, text: &str) {
        match &self.client {
            Some(client) => {
                if let Err(e) = client.send_message(chat_id, text).await {
                    error!("📨️ Could not send a message to {chat_id}. {e}");
                }
            },
            None => info!("📨️ [telegram disabled] Would send to {chat_id}:\n{text}"),
        }
    }

    pub async fn send_photo(&self, chat_id: i64, url: &str, caption: &str) {
        match &self.client {
            Some(client) => {
                if let Err(e) = client.send_photo(chat_id, url, Some(caption)).await {
                    error!("📨️ Could not send a photo to {chat_id}. {e}");
                }
            },
            None => info!("📨️ [telegram disabled] Would send photo {url} to {chat_id} ({caption})"),
        }
    }
}

pub fn order_created_message(order: &Order) -> String {
    format!(
        "🎮 New Top-up Order\n• Order ID: {id}\n• Diamonds: {diamonds}\n• Amount: {amount}\n• Method: {method}\n• \
         Owner (id): {owner}\n• Time: {time}\n\nTo confirm: use /confirm {id}\nTo fail: use /confirm {id} fail",
        id = order.id,
        diamonds = order.diamonds,
        amount = order.amount,
        method = order.method,
        owner = order.owner_id,
        time = order.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

pub fn order_resolved_message(order: &Order, outcome: Resolution) -> String {
    match outcome {
        Resolution::Confirmed => {
            format!("✅ Your order {} has been confirmed by admin. Diamonds will be delivered.", order.id)
        },
        Resolution::Failed => format!("❌ Your order {} has been marked failed by admin.", order.id),
    }
}

pub fn social_login_message(profile: &SocialProfile) -> String {
    let mut lines = vec![format!("👤 Social Login ({})", profile.provider), format!("• Name: {}", profile.name)];
    if let Some(screen_name) = &profile.screen_name {
        lines.push(format!("• Screen name: @{screen_name}"));
    }
    lines.push(format!("• ID: {}", profile.id));
    if let Some(email) = &profile.email {
        lines.push(format!("• Email: {email}"));
    }
    if let Some(url) = &profile.photo_url {
        lines.push(format!("• Photo: {url}"));
    }
    lines.push("\n⚠️ Note: No passwords are collected.".to_string());
    lines.join("\n")
}

/// Wires the notifier to the order lifecycle events.
pub fn create_notifier_event_handlers(notifier: Notifier) -> EventHandlers {
    let mut hooks = EventHooks::default();
    let on_created = notifier.clone();
    hooks.on_order_created(move |ev: OrderCreatedEvent| {
        let notifier = on_created.clone();
        debug!("📨️ Order {} created. Notifying {}", ev.order.id, notifier.new_order_recipient(&ev.order));
        Box::pin(async move { notifier.notify_order_created(&ev.order).await }) as BoxFuture<'static, ()>
    });
    hooks.on_order_resolved(move |ev: OrderResolvedEvent| {
        let notifier = notifier.clone();
        debug!("📨️ Order {} marked {}. Notifying the owner, {}", ev.order.id, ev.outcome, ev.order.owner_id);
        Box::pin(async move { notifier.notify_order_resolved(&ev.order, ev.outcome).await }) as BoxFuture<'static, ()>
    });
    EventHandlers::new(NOTIFIER_EVENT_BUFFER_SIZE, hooks)
}
