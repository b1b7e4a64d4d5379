use actix_web::{
    http::{header::ContentType, StatusCode},
    web,
    web::ServiceConfig,
};
use chrono::{Duration, Utc};
use topup_common::Rupees;
use topup_engine::{
    db_types::{Link, OrderId, OrderStatusType, Package},
    events::EventProducers,
    test_utils::prepare_test_env,
    JsonFileDatabase,
    LinkApi,
    LinkManagement,
    OrderFlowApi,
    OrderManagement,
    StoreError,
};

use super::helpers::post_request;
use crate::{
    data_objects::{PurchaseResponse, ResponseStatus},
    endpoint_tests::mocks::MockTopupStore,
    routes::PurchaseRoute,
};

fn configure(db: JsonFileDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = OrderFlowApi::new(db, EventProducers::default());
        cfg.service(PurchaseRoute::<JsonFileDatabase>::new()).app_data(web::Data::new(api));
    }
}

fn parse(body: &str) -> PurchaseResponse {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Not a purchase response: {body}. {e}"))
}

#[actix_web::test]
async fn purchase_with_json() {
    let store = prepare_test_env().await;
    let link = LinkApi::new(store.db.clone()).issue_link(42, 300, None).await.unwrap();
    let body = format!(r#"{{"token": "{}", "method": "upi"}}"#, link.token);
    let (status, body) = post_request("/purchase", ContentType::json(), &body, configure(store.db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let res = parse(&body);
    assert_eq!(res.status, ResponseStatus::Ok);
    let order_id = res.order_id.expect("No order id");
    assert_eq!(order_id.as_str().len(), 12);

    let order = store.db.fetch_order(&order_id).await.unwrap().expect("Order was not saved");
    assert_eq!(order.status, OrderStatusType::Pending);
    assert_eq!(order.amount, Rupees::from(125));
    assert_eq!(order.owner_id, 42);
    assert_eq!(order.token, link.token);
    assert!(store.db.fetch_link(&link.token).await.unwrap().unwrap().used);
}

#[actix_web::test]
async fn purchase_with_form_defaults_to_upi() {
    let store = prepare_test_env().await;
    let link = LinkApi::new(store.db.clone()).issue_link(7, 1000, Some("month")).await.unwrap();
    let body = format!("token={}", link.token);
    let (status, body) =
        post_request("/purchase", ContentType::form_url_encoded(), &body, configure(store.db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let order_id = parse(&body).order_id.unwrap();
    let order = store.db.fetch_order(&order_id).await.unwrap().unwrap();
    assert_eq!(order.method, "upi");
    assert_eq!(order.amount, Rupees::from(299));
}

#[actix_web::test]
async fn second_purchase_is_refused() {
    let store = prepare_test_env().await;
    let link = LinkApi::new(store.db.clone()).issue_link(42, 300, None).await.unwrap();
    let body = format!(r#"{{"token": "{}"}}"#, link.token);
    let (status, _) = post_request("/purchase", ContentType::json(), &body, configure(store.db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post_request("/purchase", ContentType::json(), &body, configure(store.db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"status":"error","message":"Link already used"}"#);
    assert_eq!(store.db.fetch_recent_orders(10).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn refused_purchases() {
    let store = prepare_test_env().await;
    let expired = Link::new(42, Package::from_diamonds(500).unwrap(), Some(Utc::now() - Duration::hours(1)));
    let expired = store.db.insert_link(expired).await.unwrap();
    let cases = [
        (ContentType::json(), "{}".to_string(), "missing token"),
        (ContentType::json(), String::new(), "missing token"),
        (ContentType::json(), r#"{"token": "  "}"#.to_string(), "missing token"),
        (ContentType::form_url_encoded(), "method=upi".to_string(), "missing token"),
        (ContentType::json(), r#"{"token": "deadbeef"}"#.to_string(), "Invalid token"),
        (ContentType::json(), format!(r#"{{"token": "{}"}}"#, expired.token), "Link expired"),
    ];
    for (content_type, body, message) in cases {
        let (status, res) = post_request("/purchase", content_type, &body, configure(store.db.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        let res = parse(&res);
        assert_eq!(res.status, ResponseStatus::Error);
        assert_eq!(res.message.as_deref(), Some(message), "{body}");
        assert!(res.order_id.is_none());
    }
    assert!(store.db.fetch_recent_orders(10).await.unwrap().is_empty());
}

#[actix_web::test]
async fn store_failures_use_the_error_envelope() {
    let _ = env_logger::try_init().ok();
    let configure = |cfg: &mut ServiceConfig| {
        let mut store = MockTopupStore::new();
        store
            .expect_claim_link()
            .returning(|_, _| Err(StoreError::Io { table: "links".into(), reason: "read-only file system".into() }));
        store.expect_insert_order().never();
        let api = OrderFlowApi::new(store, EventProducers::default());
        cfg.service(PurchaseRoute::<MockTopupStore>::new()).app_data(web::Data::new(api));
    };
    let (status, body) = post_request("/purchase", ContentType::json(), r#"{"token":"abc"}"#, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let res = parse(&body);
    assert_eq!(res.status, ResponseStatus::Error);
    assert_eq!(res.message.unwrap(), "Storage error: I/O error on table links. read-only file system");
    assert_eq!(res.order_id, None::<OrderId>);
}
