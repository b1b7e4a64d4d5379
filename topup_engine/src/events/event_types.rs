use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, Resolution};

/// Emitted after a link has been redeemed and the resulting order saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order: Order,
}

impl OrderCreatedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Emitted after an admin has confirmed or failed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResolvedEvent {
    pub order: Order,
    pub outcome: Resolution,
    pub resolved_at: DateTime<Utc>,
}

impl OrderResolvedEvent {
    pub fn new(order: Order, outcome: Resolution) -> Self {
        let resolved_at = order.updated_at.unwrap_or_else(Utc::now);
        Self { order, outcome, resolved_at }
    }
}
