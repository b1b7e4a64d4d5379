use chrono::{DateTime, Utc};

use crate::{
    db::traits::{OrderResolution, StoreError},
    db_types::{Order, OrderId, Resolution},
};

/// The `OrderManagement` trait defines the behaviour for storing orders and updating their status in the backend.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Appends a new order to the orders table.
    async fn insert_order(&self, order: Order) -> Result<Order, StoreError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError>;

    /// Returns up to `limit` of the most recently created orders, oldest first.
    async fn fetch_recent_orders(&self, limit: usize) -> Result<Vec<Order>, StoreError>;

    /// Moves a pending order to the terminal status given by `resolution`, stamping `updated_at` with `now` and
    /// storing the note if one is given. Orders that are already terminal are left untouched.
    async fn resolve_order(
        &self,
        order_id: &OrderId,
        resolution: Resolution,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<OrderResolution, StoreError>;
}
