use serde::Serialize;

use crate::db_types::{Link, Redeemability};

/// What the redemption view should show for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "link", rename_all = "snake_case")]
pub enum LinkStatus {
    NotFound,
    Used(Link),
    Expired(Link),
    Redeemable(Link),
}

impl LinkStatus {
    pub fn from_link(link: Link, redeemability: Redeemability) -> Self {
        match redeemability {
            Redeemability::Redeemable => Self::Redeemable(link),
            Redeemability::Used => Self::Used(link),
            Redeemability::Expired => Self::Expired(link),
        }
    }

    pub fn is_redeemable(&self) -> bool {
        matches!(self, Self::Redeemable(_))
    }
}
