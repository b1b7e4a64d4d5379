use std::fmt::Display;

use serde::{Deserialize, Serialize};
use topup_engine::{db_types::OrderId, DEFAULT_PAYMENT_METHOD};

/// The body of `POST /purchase`. Accepted as JSON or as a url-encoded form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

impl PurchaseRequest {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self { token: Some(token.into()), method: None }
    }

    pub fn with_method<S: Into<String>>(mut self, method: S) -> Self {
        self.method = Some(method.into());
        self
    }

    /// The requested payment method, or `upi` when none was given.
    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_PAYMENT_METHOD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PurchaseResponse {
    pub fn ok(order_id: OrderId) -> Self {
        Self { status: ResponseStatus::Ok, order_id: Some(order_id), message: None }
    }

    pub fn error<S: Display>(message: S) -> Self {
        Self { status: ResponseStatus::Error, order_id: None, message: Some(message.to_string()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Facebook,
    Twitter,
}

impl Display for SocialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Facebook => write!(f, "Facebook"),
            Self::Twitter => write!(f, "Twitter"),
        }
    }
}

/// The profile an OAuth provider returns after a social login. Only ever forwarded to the admin; nothing is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub provider: SocialProvider,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl SocialProfile {
    pub fn new<S: Into<String>>(provider: SocialProvider, id: S, name: S) -> Self {
        Self { provider, id: id.into(), name: name.into(), screen_name: None, email: None, photo_url: None }
    }

    pub fn with_screen_name<S: Into<String>>(mut self, screen_name: S) -> Self {
        self.screen_name = Some(screen_name.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_photo_url<S: Into<String>>(mut self, url: S) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// The handle shown under the profile photo: the screen name where the provider has one, otherwise the name.
    pub fn display_handle(&self) -> &str {
        self.screen_name.as_deref().unwrap_or(&self.name)
    }
}
