use chrono::{DateTime, Utc};

use crate::{
    db::traits::{LinkClaim, StoreError},
    db_types::{Link, LinkToken},
};

/// The `LinkManagement` trait defines the behaviour for storing and redeeming links in the backend.
#[allow(async_fn_in_trait)]
pub trait LinkManagement {
    /// Stores a newly issued link. An existing link with the same token is overwritten.
    async fn insert_link(&self, link: Link) -> Result<Link, StoreError>;

    async fn fetch_link(&self, token: &LinkToken) -> Result<Option<Link>, StoreError>;

    /// Checks that the link exists and is redeemable at `now`, and if so, marks it as used. The check and the update
    /// happen in the same read-modify-write cycle, so at most one caller can ever claim a given link.
    async fn claim_link(&self, token: &LinkToken, now: DateTime<Utc>) -> Result<LinkClaim, StoreError>;
}
