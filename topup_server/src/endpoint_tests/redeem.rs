use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{Duration, TimeZone, Utc};
use topup_common::Rupees;
use topup_engine::{
    db_types::{Link, LinkToken, Package},
    LinkApi,
    StoreError,
};

use super::helpers::get_request;
use crate::{
    endpoint_tests::mocks::MockTopupStore,
    routes::{health, PackagesRoute, RedeemRoute},
};

const TOKEN: &str = "0123456789abcdef0123456789abcdef";

fn link(used: bool, expire_at: Option<chrono::DateTime<Utc>>) -> Link {
    let package = Package::from_diamonds(300).unwrap();
    let mut link = Link::new(42, package, expire_at);
    link.token = LinkToken::from(TOKEN);
    link.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    link.used = used;
    link
}

fn configure_with(result: Result<Option<Link>, StoreError>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let mut store = MockTopupStore::new();
        store.expect_fetch_link().returning(move |_| result.clone());
        cfg.service(RedeemRoute::<MockTopupStore>::new()).app_data(web::Data::new(LinkApi::new(store)));
    }
}

#[actix_web::test]
async fn health_check() {
    let (status, body) = get_request("/health", |cfg| {
        cfg.service(health);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn price_table() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/", |cfg| {
        let api = LinkApi::new(MockTopupStore::new());
        cfg.service(PackagesRoute::<MockTopupStore>::new()).app_data(web::Data::new(api));
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    let table: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(table.len(), 12);
    assert_eq!(table[0], serde_json::json!({"diamonds": 300, "price": 125}));
    assert_eq!(table[11], serde_json::json!({"diamonds": 9000, "price": 899}));
}

#[actix_web::test]
async fn redeemable_link() {
    let _ = env_logger::try_init().ok();
    let expiry = Utc::now() + Duration::hours(1);
    let (status, body) = get_request(&format!("/redeem/{TOKEN}"), configure_with(Ok(Some(link(false, Some(expiry))))))
        .await;
    assert_eq!(status, StatusCode::OK);
    let returned: Link = serde_json::from_str(&body).unwrap();
    assert_eq!(returned.token.as_str(), TOKEN);
    assert_eq!(returned.diamonds, 300);
    assert_eq!(returned.amount, Rupees::from(125));
    assert!(!returned.used);
}

#[actix_web::test]
async fn unknown_link() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/redeem/nope", configure_with(Ok(None))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Invalid link");
}

#[actix_web::test]
async fn used_link() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(&format!("/redeem/{TOKEN}"), configure_with(Ok(Some(link(true, None))))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "This link has already been used.");
}

#[actix_web::test]
async fn expired_link() {
    let _ = env_logger::try_init().ok();
    let expired = Some(Utc::now() - Duration::minutes(1));
    let (status, body) = get_request(&format!("/redeem/{TOKEN}"), configure_with(Ok(Some(link(false, expired))))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "This link has expired.");
    // Expiry wins over use
    let (status, body) = get_request(&format!("/redeem/{TOKEN}"), configure_with(Ok(Some(link(true, expired))))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "This link has expired.");
}

#[actix_web::test]
async fn store_failure() {
    let _ = env_logger::try_init().ok();
    let err = StoreError::Io { table: "links".into(), reason: "disk on fire".into() };
    let (status, body) = get_request(&format!("/redeem/{TOKEN}"), configure_with(Err(err))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("disk on fire"), "{body}");
}
