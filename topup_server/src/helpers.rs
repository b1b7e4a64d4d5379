use actix_web::{http::header, web, HttpRequest};
use log::{debug, trace};

use crate::data_objects::PurchaseRequest;

/// Reads a purchase request from the body. It uses the `Content-Type` header to decide how to parse it:
/// 1. `application/x-www-form-urlencoded` bodies are parsed as a form.
/// 2. Anything else is parsed as JSON.
///
/// A body that cannot be parsed is treated as an empty request, which the handler then rejects for lacking a token.
pub fn read_purchase_request(req: &HttpRequest, body: &[u8]) -> PurchaseRequest {
    if body.is_empty() {
        trace!("Empty purchase request body");
        return PurchaseRequest::default();
    }
    let is_form = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);
    let parsed = if is_form {
        std::str::from_utf8(body)
            .map_err(|e| e.to_string())
            .and_then(|s| web::Query::<PurchaseRequest>::from_query(s).map_err(|e| e.to_string()))
            .map(web::Query::into_inner)
    } else {
        serde_json::from_slice::<PurchaseRequest>(body).map_err(|e| e.to_string())
    };
    parsed.unwrap_or_else(|e| {
        debug!("Could not read purchase request ({}). {e}", if is_form { "form" } else { "json" });
        PurchaseRequest::default()
    })
}
