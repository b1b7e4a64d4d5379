use chrono::{Duration, Utc};
use topup_common::Rupees;
use topup_engine::{
    db_types::{Link, LinkToken, OrderId, OrderStatusType, Package, Resolution, PACKAGES},
    events::EventProducers,
    test_utils::{prepare_test_env, TestStore},
    AccessApi,
    LinkApi,
    LinkApiError,
    LinkManagement,
    LinkStatus,
    OrderFlowApi,
    OrderFlowError,
};

#[tokio::test]
async fn issued_links_are_unused_and_priced() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let api = LinkApi::new(db);
    for package in PACKAGES {
        let link = api.issue_link(1, package.diamonds, None).await.expect("Error issuing link");
        let stored = api.fetch_link(&link.token).await.unwrap().expect("Link was not stored");
        assert!(!stored.used);
        assert_eq!(stored.amount, package.price);
        assert_eq!(stored.diamonds, package.diamonds);
        assert_eq!(stored.expire_at, None);
    }
}

#[tokio::test]
async fn unknown_package_is_rejected() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let api = LinkApi::new(db);
    let err = api.issue_link(1, 301, Some("hour")).await.expect_err("301 is not a package");
    assert!(matches!(err, LinkApiError::UnknownPackage(301)));
    assert_eq!(err.to_string(), "Unknown diamond package: 301");
}

#[tokio::test]
async fn link_periods_set_expiry() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let api = LinkApi::new(db);
    let before = Utc::now();
    let hourly = api.issue_link(1, 500, Some("hour")).await.unwrap();
    let expiry = hourly.expire_at.expect("Expected an expiry");
    assert!(expiry >= before + Duration::hours(1));
    assert!(expiry <= Utc::now() + Duration::hours(1));
    let yearly = api.issue_link(1, 500, Some("years")).await.unwrap();
    assert!(yearly.expire_at.unwrap() > before + Duration::days(364));
    let forever = api.issue_link(1, 500, Some("fortnight")).await.unwrap();
    assert_eq!(forever.expire_at, None);
}

#[tokio::test]
async fn redeeming_twice_fails() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let links = LinkApi::new(db.clone());
    let orders = OrderFlowApi::new(db, EventProducers::default());
    let link = links.issue_link(55, 1000, None).await.unwrap();
    let order = orders.create_order(&link.token, "upi").await.expect("First redemption should succeed");
    assert_eq!(order.amount, Rupees::from(299));
    let err = orders.create_order(&link.token, "upi").await.expect_err("Second redemption should fail");
    assert!(matches!(err, OrderFlowError::LinkAlreadyUsed(_)));
    assert_eq!(orders.recent_orders(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_token_is_invalid() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let orders = OrderFlowApi::new(db, EventProducers::default());
    let err = orders.create_order(&LinkToken::from("not-a-token"), "upi").await.unwrap_err();
    assert!(matches!(err, OrderFlowError::InvalidToken(_)));
    assert_eq!(err.to_string(), "Invalid token");
}

#[tokio::test]
async fn expired_links_fail_whether_used_or_not() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let orders = OrderFlowApi::new(db.clone(), EventProducers::default());
    let package = Package::from_diamonds(2000).unwrap();
    let past = Some(Utc::now() - Duration::seconds(5));
    let fresh = db.insert_link(Link::new(3, package, past)).await.unwrap();
    let mut used = Link::new(3, package, past);
    used.used = true;
    let used = db.insert_link(used).await.unwrap();
    for token in [fresh.token, used.token] {
        let err = orders.create_order(&token, "upi").await.unwrap_err();
        assert!(matches!(err, OrderFlowError::LinkExpired(_)), "{err:?}");
    }
    assert!(orders.recent_orders(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn classification_for_redeem_view() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let links = LinkApi::new(db.clone());
    let orders = OrderFlowApi::new(db, EventProducers::default());
    let link = links.issue_link(8, 300, Some("hour")).await.unwrap();
    assert!(links.classify(&link.token).await.unwrap().is_redeemable());
    let later = Utc::now() + Duration::hours(2);
    assert!(matches!(links.classify_at(&link.token, later).await.unwrap(), LinkStatus::Expired(_)));
    orders.create_order(&link.token, "upi").await.unwrap();
    assert!(matches!(links.classify(&link.token).await.unwrap(), LinkStatus::Used(_)));
    assert_eq!(links.classify(&LinkToken::from("missing")).await.unwrap(), LinkStatus::NotFound);
}

#[tokio::test]
async fn resolving_unknown_order_returns_none() {
    let TestStore { dir, db } = prepare_test_env().await;
    let orders = OrderFlowApi::new(db, EventProducers::default());
    let before = std::fs::read(dir.path().join("purchases.json")).unwrap();
    let result = orders.resolve_order(&OrderId::from("abcdef123456"), Resolution::Confirmed, None).await;
    assert_eq!(result.unwrap(), None);
    assert_eq!(std::fs::read(dir.path().join("purchases.json")).unwrap(), before);
}

#[tokio::test]
async fn resolved_orders_are_terminal() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let links = LinkApi::new(db.clone());
    let orders = OrderFlowApi::new(db, EventProducers::default());
    let link = links.issue_link(9, 800, None).await.unwrap();
    let order = orders.create_order(&link.token, "upi").await.unwrap();
    let confirmed = orders.resolve_order(&order.id, Resolution::Confirmed, None).await.unwrap().unwrap();
    assert_eq!(confirmed.status, OrderStatusType::Confirmed);
    assert!(confirmed.updated_at.is_some());
    let reread = orders.fetch_order(&order.id).await.unwrap().unwrap();
    assert_eq!(reread.status, OrderStatusType::Confirmed);

    let err = orders.resolve_order(&order.id, Resolution::Failed, Some("oops".into())).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::OrderAlreadyResolved(_)));
    let reread = orders.fetch_order(&order.id).await.unwrap().unwrap();
    assert_eq!(reread.status, OrderStatusType::Confirmed);
    assert_eq!(reread.admin_note, None);
}

#[tokio::test]
async fn blank_method_defaults_to_upi() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let links = LinkApi::new(db.clone());
    let orders = OrderFlowApi::new(db, EventProducers::default());
    let link = links.issue_link(9, 800, None).await.unwrap();
    let order = orders.create_order(&link.token, "  ").await.unwrap();
    assert_eq!(order.method, "upi");
}

#[tokio::test]
async fn hourly_grants_lapse() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let access = AccessApi::new(db);
    assert!(!access.is_allowed(77).await.unwrap());
    access.grant(77, Some("hour")).await.unwrap();
    assert!(access.is_allowed(77).await.unwrap());
    let just_after = Utc::now() + Duration::hours(1) + Duration::seconds(1);
    assert!(!access.is_allowed_at(77, just_after).await.unwrap());
    // The lapsed grant is still stored until it is overwritten or revoked
    assert!(access.fetch_grant(77).await.unwrap().is_some());
}

#[tokio::test]
async fn open_ended_grants_last_until_revoked() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let access = AccessApi::new(db);
    access.grant(78, None).await.unwrap();
    let far_future = Utc::now() + Duration::days(3650);
    assert!(access.is_allowed_at(78, far_future).await.unwrap());
    assert!(access.revoke(78).await.unwrap());
    assert!(!access.is_allowed(78).await.unwrap());
    assert!(!access.revoke(78).await.unwrap());
}

#[tokio::test]
async fn regrant_overwrites() {
    let TestStore { dir: _dir, db } = prepare_test_env().await;
    let access = AccessApi::new(db);
    access.grant(79, None).await.unwrap();
    access.grant(79, Some("hour")).await.unwrap();
    let later = Utc::now() + Duration::hours(2);
    assert!(!access.is_allowed_at(79, later).await.unwrap());
}
