//! A minimal client for the Telegram Bot API: long polling for updates and sending messages and photos.
mod client;
mod data_objects;
mod errors;

pub use client::{TelegramClient, TELEGRAM_API_URL};
pub use data_objects::{ApiResponse, Chat, Message, Update, User};
pub use errors::TelegramError;
