use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db::traits::GrantManagement,
    db_types::{Grant, Period},
    topup_api::errors::AccessApiError,
};

/// `AccessApi` manages which non-admin users may issue links for themselves.
///
/// Expired grants are not deleted; they simply stop counting when [`AccessApi::is_allowed`] is evaluated.
pub struct AccessApi<B> {
    db: B,
}

impl<B> Debug for AccessApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessApi")
    }
}

impl<B> AccessApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AccessApi<B>
where B: GrantManagement
{
    /// Grants access to `user_id` for the given period keyword, replacing any existing grant.
    pub async fn grant(&self, user_id: i64, period: Option<&str>) -> Result<Grant, AccessApiError> {
        let period = Period::from_keyword(period);
        let grant = self.db.upsert_grant(Grant::new(user_id, period)).await?;
        info!("🔑️ User {user_id} may issue links ({period})");
        Ok(grant)
    }

    /// Returns true if a grant existed and was removed.
    pub async fn revoke(&self, user_id: i64) -> Result<bool, AccessApiError> {
        let removed = self.db.remove_grant(user_id).await?;
        if removed {
            info!("🔑️ Access revoked for user {user_id}");
        } else {
            debug!("🔑️ Nothing to revoke for user {user_id}");
        }
        Ok(removed)
    }

    pub async fn is_allowed(&self, user_id: i64) -> Result<bool, AccessApiError> {
        self.is_allowed_at(user_id, Utc::now()).await
    }

    pub async fn is_allowed_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<bool, AccessApiError> {
        let allowed = self.db.fetch_grant(user_id).await?.map(|g| g.is_active_at(now)).unwrap_or(false);
        trace!("🔑️ User {user_id} allowed: {allowed}");
        Ok(allowed)
    }

    pub async fn fetch_grant(&self, user_id: i64) -> Result<Option<Grant>, AccessApiError> {
        Ok(self.db.fetch_grant(user_id).await?)
    }
}
