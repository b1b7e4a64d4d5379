use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;
use topup_engine::{LinkApiError, OrderFlowError, StoreError};

use crate::data_objects::PurchaseResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Invalid link")]
    InvalidLink,
    #[error("This link has already been used.")]
    LinkAlreadyUsed,
    #[error("This link has expired.")]
    LinkExpired,
    /// A purchase that could not be completed. Rendered as `{status: "error", message}`.
    #[error("{0}")]
    PurchaseFailed(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidLink => StatusCode::NOT_FOUND,
            Self::LinkAlreadyUsed => StatusCode::BAD_REQUEST,
            Self::LinkExpired => StatusCode::BAD_REQUEST,
            Self::PurchaseFailed(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::PurchaseFailed(message) => {
                HttpResponse::build(self.status_code()).json(PurchaseResponse::error(message))
            },
            Self::InvalidLink | Self::LinkAlreadyUsed | Self::LinkExpired => HttpResponse::build(self.status_code())
                .insert_header(ContentType::plaintext())
                .body(self.to_string()),
            _ => HttpResponse::build(self.status_code())
                .insert_header(ContentType::json())
                .body(serde_json::json!({ "error": self.to_string() }).to_string()),
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        Self::BackendError(e.to_string())
    }
}

impl From<LinkApiError> for ServerError {
    fn from(e: LinkApiError) -> Self {
        match e {
            LinkApiError::UnknownPackage(_) => Self::PurchaseFailed(e.to_string()),
            LinkApiError::StoreError(e) => e.into(),
        }
    }
}

/// Every order-flow failure, storage included, is reported to the buyer through the purchase envelope.
impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        Self::PurchaseFailed(e.to_string())
    }
}
