use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TelegramError {
    #[error("Could not create the Telegram client. {0}")]
    Initialization(String),
    #[error("The request to Telegram failed. {0}")]
    RequestError(String),
    #[error("Telegram returned an error ({code}). {description}")]
    ApiError { code: u16, description: String },
    #[error("Could not deserialize the Telegram response. {0}")]
    JsonError(String),
}
