use thiserror::Error;

use crate::db_types::{Link, Order};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("I/O error on table {table}. {reason}")]
    Io { table: String, reason: String },
    #[error("Could not serialize table {table}. {reason}")]
    Serialization { table: String, reason: String },
    #[error("Table {table} contains malformed data. {reason}")]
    Corrupt { table: String, reason: String },
}

/// Outcome of trying to claim (mark as used) a redeem link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClaim {
    /// The link was redeemable and is now marked as used. The updated record is returned.
    Claimed(Link),
    NotFound,
    AlreadyUsed(Link),
    Expired(Link),
}

/// Outcome of trying to move an order into a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderResolution {
    Resolved(Order),
    NotFound,
    /// The order was already confirmed or failed. It has not been changed.
    AlreadyResolved(Order),
}
