use thiserror::Error;

use crate::{
    db::traits::StoreError,
    db_types::{LinkToken, OrderId},
};

#[derive(Debug, Clone, Error)]
pub enum LinkApiError {
    #[error("Unknown diamond package: {0}")]
    UnknownPackage(u32),
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Invalid token")]
    InvalidToken(LinkToken),
    #[error("Link already used")]
    LinkAlreadyUsed(LinkToken),
    #[error("Link expired")]
    LinkExpired(LinkToken),
    #[error("Order {0} has already been resolved")]
    OrderAlreadyResolved(OrderId),
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
}

#[derive(Debug, Clone, Error)]
pub enum AccessApiError {
    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),
}
