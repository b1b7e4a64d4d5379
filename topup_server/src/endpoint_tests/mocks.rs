use chrono::{DateTime, Utc};
use mockall::mock;
use topup_engine::{
    db_types::{Grant, Link, LinkToken, Order, OrderId, Resolution},
    GrantManagement,
    LinkClaim,
    LinkManagement,
    OrderManagement,
    OrderResolution,
    StoreError,
};

mock! {
    pub TopupStore {}
    impl LinkManagement for TopupStore {
        async fn insert_link(&self, link: Link) -> Result<Link, StoreError>;
        async fn fetch_link(&self, token: &LinkToken) -> Result<Option<Link>, StoreError>;
        async fn claim_link(&self, token: &LinkToken, now: DateTime<Utc>) -> Result<LinkClaim, StoreError>;
    }
    impl OrderManagement for TopupStore {
        async fn insert_order(&self, order: Order) -> Result<Order, StoreError>;
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError>;
        async fn fetch_recent_orders(&self, limit: usize) -> Result<Vec<Order>, StoreError>;
        async fn resolve_order(&self, order_id: &OrderId, resolution: Resolution, note: Option<String>, now: DateTime<Utc>) -> Result<OrderResolution, StoreError>;
    }
    impl GrantManagement for TopupStore {
        async fn upsert_grant(&self, grant: Grant) -> Result<Grant, StoreError>;
        async fn remove_grant(&self, user_id: i64) -> Result<bool, StoreError>;
        async fn fetch_grant(&self, user_id: i64) -> Result<Option<Grant>, StoreError>;
    }
}
