use crate::{db::traits::StoreError, db_types::Grant};

/// The `GrantManagement` trait defines the behaviour for storing access grants in the backend.
#[allow(async_fn_in_trait)]
pub trait GrantManagement {
    /// Stores the grant, replacing any previous grant for the same user.
    async fn upsert_grant(&self, grant: Grant) -> Result<Grant, StoreError>;

    /// Removes the grant for the user. Returns true if there was one to remove.
    async fn remove_grant(&self, user_id: i64) -> Result<bool, StoreError>;

    async fn fetch_grant(&self, user_id: i64) -> Result<Option<Grant>, StoreError>;
}
