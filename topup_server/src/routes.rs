//! Request handler definitions
//!
//! The web surface is small: a health check, the price table, the redemption view and the purchase endpoint.
//! Handlers that grow beyond a few lines should move their logic into the engine or into [`crate::helpers`].
//!
//! Every handler is async and all store access goes through the engine APIs, which do their file I/O on the tokio
//! runtime. Never block a worker thread in a handler; actix processes a worker's requests one after another.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use topup_engine::{
    db_types::LinkToken,
    LinkApi,
    LinkManagement,
    LinkStatus,
    OrderFlowApi,
    TopupDatabase,
};

use crate::{data_objects::PurchaseResponse, errors::ServerError, helpers::read_purchase_request};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Packages  --------------------------------------------------
route!(packages => Get "/" impl LinkManagement);
/// The diamond packages on offer, in ascending order of size.
pub async fn packages<B: LinkManagement>(api: web::Data<LinkApi<B>>) -> HttpResponse {
    trace!("💻️ Received price table request");
    HttpResponse::Ok().json(api.packages())
}

// ----------------------------------------------   Redeem  ----------------------------------------------------
route!(redeem => Get "/redeem/{token}" impl LinkManagement);
/// Route handler for the redemption view.
///
/// Returns the link as JSON if it can still be paid for. Otherwise:
/// * `404 Invalid link` when the token is unknown,
/// * `400 This link has expired.` when the expiry has passed (whether or not it was used),
/// * `400 This link has already been used.` for a link that was redeemed already.
///
/// Nothing is modified.
pub async fn redeem<B: LinkManagement>(
    path: web::Path<String>,
    api: web::Data<LinkApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let token = LinkToken::from(path.into_inner());
    trace!("💻️ Redemption view requested for {token}");
    match api.classify(&token).await? {
        LinkStatus::Redeemable(link) => Ok(HttpResponse::Ok().json(link)),
        LinkStatus::NotFound => Err(ServerError::InvalidLink),
        LinkStatus::Used(_) => Err(ServerError::LinkAlreadyUsed),
        LinkStatus::Expired(_) => Err(ServerError::LinkExpired),
    }
}

// ----------------------------------------------   Purchase  --------------------------------------------------
route!(purchase => Post "/purchase" impl TopupDatabase);
/// Route handler for purchases.
///
/// The body is `{token, method?}`, either as JSON or as a url-encoded form. On success the link is spent, a pending
/// order is created and `{"status": "ok", "order_id": ...}` is returned. Any failure is returned with status 400 as
/// `{"status": "error", "message": ...}`.
pub async fn purchase<B: TopupDatabase>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = read_purchase_request(&req, &body);
    let token = match request.token.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => LinkToken::from(t),
        _ => {
            debug!("💻️ Purchase request without a token");
            return Err(ServerError::PurchaseFailed("missing token".into()));
        },
    };
    debug!("💻️ Purchase requested for link {token} via {}", request.method());
    let order = api.create_order(&token, request.method()).await.map_err(|e| {
        info!("💻️ Purchase for link {token} was refused. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(PurchaseResponse::ok(order.id)))
}
