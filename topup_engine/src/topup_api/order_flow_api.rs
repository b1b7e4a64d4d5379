use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db::traits::{LinkClaim, LinkManagement, OrderManagement, OrderResolution},
    db_types::{LinkToken, Order, OrderId, Resolution},
    events::{EventProducers, OrderCreatedEvent, OrderResolvedEvent},
    topup_api::errors::OrderFlowError,
};

/// The default payment method label when the customer does not give one.
pub const DEFAULT_PAYMENT_METHOD: &str = "upi";

/// `OrderFlowApi` is the primary API for turning redeemed links into orders and for resolving those orders.
///
/// The order life cycle is
///
/// | From \ To | Pending | Confirmed | Failed |
/// |-----------|---------|-----------|--------|
/// | (link)    | create  |           |        |
/// | Pending   |         | resolve   | resolve|
/// | Confirmed | Err     | Err       | Err    |
/// | Failed    | Err     | Err       | Err    |
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    async fn call_order_created_hook(&self, order: &Order) {
        for emitter in &self.producers.order_created_producer {
            debug!("🔄️📦️ Notifying order created hook subscribers");
            emitter.publish_event(OrderCreatedEvent::new(order.clone())).await;
        }
    }

    async fn call_order_resolved_hook(&self, order: &Order, outcome: Resolution) {
        for emitter in &self.producers.order_resolved_producer {
            debug!("🔄️📦️ Notifying order resolved hook subscribers");
            emitter.publish_event(OrderResolvedEvent::new(order.clone(), outcome)).await;
        }
    }
}

impl<B> OrderFlowApi<B>
where B: LinkManagement + OrderManagement
{
    /// Redeems the link identified by `token` and creates a pending order for it.
    ///
    /// The link is claimed (marked as used) and saved first; only then is the order appended to the orders table.
    /// These are two separate writes. If the second fails, the link stays used and no order exists for it. There is
    /// no compensating action: the error is returned and the orphaned token is logged so an admin can reissue.
    ///
    /// ## Failure modes:
    /// * [`OrderFlowError::InvalidToken`] if there is no such link.
    /// * [`OrderFlowError::LinkExpired`] if the link's expiry has passed, whether or not it was used.
    /// * [`OrderFlowError::LinkAlreadyUsed`] if the link was already redeemed.
    pub async fn create_order(&self, token: &LinkToken, method: &str) -> Result<Order, OrderFlowError> {
        let link = match self.db.claim_link(token, Utc::now()).await? {
            LinkClaim::Claimed(link) => link,
            LinkClaim::NotFound => {
                debug!("🔄️📦️ Redemption attempted with unknown token {token}");
                return Err(OrderFlowError::InvalidToken(token.clone()));
            },
            LinkClaim::AlreadyUsed(_) => {
                debug!("🔄️📦️ Redemption attempted with used token {token}");
                return Err(OrderFlowError::LinkAlreadyUsed(token.clone()));
            },
            LinkClaim::Expired(_) => {
                debug!("🔄️📦️ Redemption attempted with expired token {token}");
                return Err(OrderFlowError::LinkExpired(token.clone()));
            },
        };
        let method = match method.trim() {
            "" => DEFAULT_PAYMENT_METHOD,
            m => m,
        };
        let order = Order::for_link(&link, method);
        let order = self.db.insert_order(order).await.map_err(|e| {
            error!(
                "🔄️📦️ Link {token} was marked as used, but the order for it could not be saved. The link is now \
                 orphaned and must be reissued. {e}"
            );
            OrderFlowError::from(e)
        })?;
        info!(
            "🔄️📦️ Order {} created from link {token}: {} diamonds, {}, via {}",
            order.id, order.diamonds, order.amount, order.method
        );
        self.call_order_created_hook(&order).await;
        Ok(order)
    }

    /// Confirms or fails a pending order.
    ///
    /// Returns `Ok(None)` if there is no order with this id; nothing is changed in that case.
    /// Orders that have already been confirmed or failed cannot be resolved again and produce
    /// [`OrderFlowError::OrderAlreadyResolved`].
    pub async fn resolve_order(
        &self,
        order_id: &OrderId,
        outcome: Resolution,
        note: Option<String>,
    ) -> Result<Option<Order>, OrderFlowError> {
        match self.db.resolve_order(order_id, outcome, note, Utc::now()).await? {
            OrderResolution::Resolved(order) => {
                info!("🔄️✅️ Order {order_id} marked {outcome}");
                self.call_order_resolved_hook(&order, outcome).await;
                Ok(Some(order))
            },
            OrderResolution::NotFound => {
                debug!("🔄️✅️ Cannot resolve order {order_id}. It does not exist.");
                Ok(None)
            },
            OrderResolution::AlreadyResolved(order) => {
                warn!("🔄️✅️ Refusing to mark order {order_id} {outcome}. It is already {}.", order.status);
                Err(OrderFlowError::OrderAlreadyResolved(order_id.clone()))
            },
        }
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError> {
        Ok(self.db.fetch_order(order_id).await?)
    }

    /// The `limit` most recent orders, oldest first.
    pub async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>, OrderFlowError> {
        Ok(self.db.fetch_recent_orders(limit).await?)
    }
}
