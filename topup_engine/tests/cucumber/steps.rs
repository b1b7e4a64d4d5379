use chrono::{Duration, Utc};
use cucumber::{then, when};
use topup_common::Rupees;
use topup_engine::{
    db_types::{Link, LinkToken, OrderStatusType, Package, Resolution},
    LinkManagement,
    LinkStatus,
};

use crate::cucumber::TopupWorld;

#[when(expr = "user {int} is issued a link for {int} diamonds")]
async fn issue_link(world: &mut TopupWorld, owner: i64, diamonds: u32) {
    match world.system().links.issue_link(owner, diamonds, None).await {
        Ok(link) => {
            world.last_link = Some(link);
            world.last_error = None;
        },
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[when(expr = "user {int} is issued a link for {int} diamonds valid for a(n) {word}")]
async fn issue_link_with_period(world: &mut TopupWorld, owner: i64, diamonds: u32, period: String) {
    let link = world.system().links.issue_link(owner, diamonds, Some(&period)).await.expect("Error issuing link");
    world.last_link = Some(link);
}

#[when(expr = "user {int} has a link for {int} diamonds that expired {int} minutes ago")]
async fn expired_link(world: &mut TopupWorld, owner: i64, diamonds: u32, minutes: i64) {
    let package = Package::from_diamonds(diamonds).expect("Unknown package");
    let link = Link::new(owner, package, Some(Utc::now() - Duration::minutes(minutes)));
    let link = world.system().links.db().insert_link(link).await.expect("Error inserting link");
    world.last_link = Some(link);
}

#[when(expr = "the customer pays for the link with {string}")]
async fn pay_for_link(world: &mut TopupWorld, method: String) {
    let token = world.last_link().token.clone();
    redeem(world, token, method).await;
}

#[when(expr = "the customer pays for token {word}")]
async fn pay_for_token(world: &mut TopupWorld, token: String) {
    redeem(world, LinkToken::from(token), "upi".to_string()).await;
}

async fn redeem(world: &mut TopupWorld, token: LinkToken, method: String) {
    match world.system().orders.create_order(&token, &method).await {
        Ok(order) => {
            world.last_order = Some(order);
            world.last_error = None;
        },
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[when(expr = "the admin marks the order {word}")]
async fn resolve(world: &mut TopupWorld, outcome: String) {
    let outcome = match outcome.as_str() {
        "confirmed" => Resolution::Confirmed,
        "failed" => Resolution::Failed,
        other => panic!("Unknown outcome: {other}"),
    };
    let id = world.last_order().id.clone();
    match world.system().orders.resolve_order(&id, outcome, None).await {
        Ok(Some(order)) => {
            world.last_order = Some(order);
            world.last_error = None;
        },
        Ok(None) => world.last_error = Some(format!("Order {id} not found")),
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[then(expr = "the link costs ₹{int}")]
async fn link_costs(world: &mut TopupWorld, amount: i64) {
    assert_eq!(world.last_link().amount, Rupees::from(amount));
}

#[then(expr = "the link expires about {int} hour(s) from now")]
async fn link_expires_in(world: &mut TopupWorld, hours: i64) {
    let expire_at = world.last_link().expire_at.expect("The link has no expiry");
    let drift = (expire_at - (Utc::now() + Duration::hours(hours))).num_seconds().abs();
    assert!(drift < 60, "Link expires at {expire_at}, which is {drift}s off");
}

#[then(expr = "the link never expires")]
async fn link_never_expires(world: &mut TopupWorld) {
    assert!(world.last_link().expire_at.is_none());
}

#[then(expr = "the link is {word}")]
async fn link_is(world: &mut TopupWorld, expected: String) {
    let token = world.last_link().token.clone();
    let status = world.system().links.classify(&token).await.expect("Error classifying link");
    let actual = match status {
        LinkStatus::NotFound => "unknown",
        LinkStatus::Used(_) => "used",
        LinkStatus::Expired(_) => "expired",
        LinkStatus::Redeemable(_) => "redeemable",
    };
    assert_eq!(actual, expected);
}

#[then(expr = "the order is {word} for ₹{int} via {string}")]
async fn order_is(world: &mut TopupWorld, status: String, amount: i64, method: String) {
    let order = world.last_order();
    assert_eq!(order.status, status.parse::<OrderStatusType>().expect("Invalid order status"));
    assert_eq!(order.amount, Rupees::from(amount));
    assert_eq!(order.method, method);
}

#[then(expr = "the order is {word}")]
async fn order_status(world: &mut TopupWorld, status: String) {
    let id = world.last_order().id.clone();
    let order = world.system().orders.fetch_order(&id).await.expect("Error fetching order").expect("Order missing");
    assert_eq!(order.status, status.parse::<OrderStatusType>().expect("Invalid order status"));
}

/// `{order}` in the expected message stands for the id of the last order.
#[then(expr = "the request fails with {string}")]
async fn request_fails(world: &mut TopupWorld, message: String) {
    let err = world.last_error.take().expect("Expected the last request to fail");
    let expected = match &world.last_order {
        Some(order) => message.replace("{order}", order.id.as_str()),
        None => message,
    };
    assert_eq!(err, expected);
}

#[then(expr = "there are {int} orders")]
async fn order_count(world: &mut TopupWorld, count: usize) {
    let orders = world.system().orders.recent_orders(100).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}
