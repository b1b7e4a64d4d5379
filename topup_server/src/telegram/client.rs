use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use topup_common::Secret;

use crate::telegram::{ApiResponse, Message, TelegramError, Update};

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Extra time allowed on top of the long-poll timeout before the HTTP request itself is abandoned.
const REQUEST_GRACE: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TelegramClient {
    token: Secret<String>,
    api_url: String,
    client: Arc<Client>,
}

impl TelegramClient {
    pub fn new(token: Secret<String>, poll_timeout: Duration) -> Result<Self, TelegramError> {
        Self::new_with_url(token, TELEGRAM_API_URL, poll_timeout)
    }

    pub fn new_with_url(token: Secret<String>, api_url: &str, poll_timeout: Duration) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(poll_timeout + REQUEST_GRACE)
            .build()
            .map_err(|e| TelegramError::Initialization(e.to_string()))?;
        let api_url = api_url.trim_end_matches('/').to_string();
        Ok(Self { token, api_url, client: Arc::new(client) })
    }

    /// The URL for `method`. It contains the bot token, so never log it.
    fn url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_url, self.token.reveal())
    }

    pub async fn call<T: DeserializeOwned, B: Serialize>(&self, method: &str, body: &B) -> Result<T, TelegramError> {
        trace!("🤖️ Calling Telegram {method}");
        let response = self
            .client
            .post(self.url(method))
            .json(body)
            .send()
            .await
            // reqwest includes the URL in its errors
            .map_err(|e| TelegramError::RequestError(e.without_url().to_string()))?;
        let status = response.status().as_u16();
        let result = response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| TelegramError::JsonError(e.without_url().to_string()))?;
        match result {
            ApiResponse { ok: true, result: Some(value), .. } => Ok(value),
            ApiResponse { error_code, description, .. } => Err(TelegramError::ApiError {
                code: error_code.unwrap_or(status),
                description: description.unwrap_or_else(|| format!("{method} returned no result")),
            }),
        }
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout: Duration) -> Result<Vec<Update>, TelegramError> {
        let body = json!({
            "offset": offset,
            "timeout": timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        self.call("getUpdates", &body).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        let body = json!({ "chat_id": chat_id, "text": text });
        let msg = self.call::<Message, _>("sendMessage", &body).await?;
        debug!("🤖️ Sent message {} to {chat_id}", msg.message_id);
        Ok(msg)
    }

    /// Sends the image at `photo_url`. Telegram fetches the image itself.
    pub async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: Option<&str>,
    ) -> Result<Message, TelegramError> {
        let mut body = json!({ "chat_id": chat_id, "photo": photo_url });
        if let Some(caption) = caption {
            body["caption"] = json!(caption);
        }
        let msg = self.call::<Message, _>("sendPhoto", &body).await?;
        debug!("🤖️ Sent photo {} to {chat_id}", msg.message_id);
        Ok(msg)
    }
}
