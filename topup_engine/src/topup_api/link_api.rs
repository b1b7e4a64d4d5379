use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db::traits::LinkManagement,
    db_types::{Link, LinkToken, Package, Period, PACKAGES},
    topup_api::{errors::LinkApiError, link_objects::LinkStatus},
};

/// `LinkApi` issues single-use redeem links and answers questions about them.
pub struct LinkApi<B> {
    db: B,
}

impl<B> Debug for LinkApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LinkApi")
    }
}

impl<B> LinkApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The fixed price table.
    pub fn packages(&self) -> &'static [Package] {
        &PACKAGES
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> LinkApi<B>
where B: LinkManagement
{
    /// Issues a new link for `owner_id` to buy the package identified by `diamonds`.
    ///
    /// `period` is a keyword ("hour", "month", "year", matched on prefix). Anything else, or `None`, produces a link
    /// that never expires.
    pub async fn issue_link(&self, owner_id: i64, diamonds: u32, period: Option<&str>) -> Result<Link, LinkApiError> {
        let package = Package::from_diamonds(diamonds).ok_or(LinkApiError::UnknownPackage(diamonds))?;
        let period = Period::from_keyword(period);
        let link = Link::new(owner_id, package, period.expiry_from(Utc::now()));
        let link = self.db.insert_link(link).await?;
        info!("🔗️ Issued link {} for user {owner_id}: {package}, {period}", link.token);
        Ok(link)
    }

    pub async fn fetch_link(&self, token: &LinkToken) -> Result<Option<Link>, LinkApiError> {
        Ok(self.db.fetch_link(token).await?)
    }

    /// Classifies the link for the redemption view. Nothing is modified.
    pub async fn classify(&self, token: &LinkToken) -> Result<LinkStatus, LinkApiError> {
        self.classify_at(token, Utc::now()).await
    }

    pub async fn classify_at(&self, token: &LinkToken, now: DateTime<Utc>) -> Result<LinkStatus, LinkApiError> {
        let status = match self.db.fetch_link(token).await? {
            Some(link) => {
                let redeemability = link.redeemability_at(now);
                LinkStatus::from_link(link, redeemability)
            },
            None => LinkStatus::NotFound,
        };
        trace!("🔗️ Link {token} classified as {status:?}");
        Ok(status)
    }
}
