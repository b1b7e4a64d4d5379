use std::{
    collections::BTreeMap,
    fmt::Debug,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::*;
use tokio::fs;

use super::table::{Change, CorruptionPolicy, JsonTable};
use crate::{
    db::traits::{GrantManagement, LinkClaim, LinkManagement, OrderManagement, OrderResolution, StoreError},
    db_types::{Grant, Link, LinkToken, Order, OrderId, Redeemability, Resolution},
};

pub const LINKS_FILE: &str = "links.json";
pub const ORDERS_FILE: &str = "purchases.json";
pub const GRANTS_FILE: &str = "allowed.json";

pub type LinksTable = BTreeMap<LinkToken, Link>;
pub type OrdersTable = Vec<Order>;
/// Grants are keyed by the decimal string form of the user id.
pub type GrantsTable = BTreeMap<String, Grant>;

/// The flat-file backend. Each logical table lives in its own JSON file in `data_dir`.
///
/// Cloning is cheap and clones share the table locks, so every clone of one `JsonFileDatabase` sees serialised access
/// to each table. Two *separately opened* instances on the same directory do not share locks.
#[derive(Clone)]
pub struct JsonFileDatabase {
    data_dir: PathBuf,
    links: JsonTable<LinksTable>,
    orders: JsonTable<OrdersTable>,
    grants: JsonTable<GrantsTable>,
}

impl Debug for JsonFileDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonFileDatabase ({})", self.data_dir.display())
    }
}

impl JsonFileDatabase {
    /// Opens (and creates, if necessary) the three tables in `data_dir`.
    pub async fn open<P: AsRef<Path>>(data_dir: P, policy: CorruptionPolicy) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| StoreError::Io { table: data_dir.display().to_string(), reason: e.to_string() })?;
        let links = JsonTable::open("links", data_dir.join(LINKS_FILE), policy).await?;
        let orders = JsonTable::open("orders", data_dir.join(ORDERS_FILE), policy).await?;
        let grants = JsonTable::open("grants", data_dir.join(GRANTS_FILE), policy).await?;
        info!("🗃️ Opened top-up store in {} (corrupt tables: {policy:?})", data_dir.display());
        Ok(Self { data_dir, links, orders, grants })
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }

    pub fn links(&self) -> &JsonTable<LinksTable> {
        &self.links
    }

    pub fn orders(&self) -> &JsonTable<OrdersTable> {
        &self.orders
    }

    pub fn grants(&self) -> &JsonTable<GrantsTable> {
        &self.grants
    }
}

impl LinkManagement for JsonFileDatabase {
    async fn insert_link(&self, link: Link) -> Result<Link, StoreError> {
        self.links
            .modify(|links| {
                if links.contains_key(&link.token) {
                    warn!("🗃️ Link token {} already exists and is being overwritten", link.token);
                }
                links.insert(link.token.clone(), link.clone());
                Ok::<_, StoreError>(Change::Write(link))
            })
            .await
    }

    async fn fetch_link(&self, token: &LinkToken) -> Result<Option<Link>, StoreError> {
        let links = self.links.load().await?;
        Ok(links.get(token).cloned())
    }

    async fn claim_link(&self, token: &LinkToken, now: DateTime<Utc>) -> Result<LinkClaim, StoreError> {
        self.links
            .modify(|links| {
                let Some(link) = links.get_mut(token) else {
                    return Ok::<_, StoreError>(Change::Keep(LinkClaim::NotFound));
                };
                let claim = match link.redeemability_at(now) {
                    Redeemability::Expired => Change::Keep(LinkClaim::Expired(link.clone())),
                    Redeemability::Used => Change::Keep(LinkClaim::AlreadyUsed(link.clone())),
                    Redeemability::Redeemable => {
                        link.used = true;
                        Change::Write(LinkClaim::Claimed(link.clone()))
                    },
                };
                Ok(claim)
            })
            .await
    }
}

impl OrderManagement for JsonFileDatabase {
    async fn insert_order(&self, order: Order) -> Result<Order, StoreError> {
        self.orders
            .modify(|orders| {
                orders.push(order.clone());
                Ok::<_, StoreError>(Change::Write(order))
            })
            .await
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.load().await?;
        Ok(orders.into_iter().find(|o| &o.id == order_id))
    }

    async fn fetch_recent_orders(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        let mut orders = self.orders.load().await?;
        let skip = orders.len().saturating_sub(limit);
        Ok(orders.split_off(skip))
    }

    async fn resolve_order(
        &self,
        order_id: &OrderId,
        resolution: Resolution,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<OrderResolution, StoreError> {
        self.orders
            .modify(|orders| {
                let Some(order) = orders.iter_mut().find(|o| &o.id == order_id) else {
                    return Ok::<_, StoreError>(Change::Keep(OrderResolution::NotFound));
                };
                if order.status.is_terminal() {
                    return Ok(Change::Keep(OrderResolution::AlreadyResolved(order.clone())));
                }
                order.status = resolution.status();
                order.updated_at = Some(now);
                if note.is_some() {
                    order.admin_note = note;
                }
                Ok(Change::Write(OrderResolution::Resolved(order.clone())))
            })
            .await
    }
}

impl GrantManagement for JsonFileDatabase {
    async fn upsert_grant(&self, grant: Grant) -> Result<Grant, StoreError> {
        self.grants
            .modify(|grants| {
                grants.insert(grant.user_id.to_string(), grant.clone());
                Ok::<_, StoreError>(Change::Write(grant))
            })
            .await
    }

    async fn remove_grant(&self, user_id: i64) -> Result<bool, StoreError> {
        self.grants
            .modify(|grants| {
                let change = match grants.remove(&user_id.to_string()) {
                    Some(_) => Change::Write(true),
                    None => Change::Keep(false),
                };
                Ok::<_, StoreError>(change)
            })
            .await
    }

    async fn fetch_grant(&self, user_id: i64) -> Result<Option<Grant>, StoreError> {
        let grants = self.grants.load().await?;
        Ok(grants.get(&user_id.to_string()).cloned())
    }
}
