//! API routing
//!
//! # Routes
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /printers | GET | installed printer names |
//! | /print | POST | raw byte submission |
//! | /print-sato | POST | title/barcode label |
//!
//! Everything else is 404 "Not found"; OPTIONS on any path is answered
//! with 200 for CORS preflight. Open CORS headers go on every response.

pub mod print;
pub mod printers;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Router, middleware};
use http::{Method, StatusCode, header};
use tower_http::cors::{Any, CorsLayer};

use crate::core::ServiceState;

/// HTTP request log middleware
async fn log_request(request: axum::extract::Request, next: middleware::Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Shared fallback: a bare OPTIONS is the preflight short-circuit, anything
/// else reaching here is an undefined route.
async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not found").into_response()
    }
}

/// Build the Axum router with open CORS on every response
pub fn build_router(state: ServiceState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/printers", get(printers::list))
        .route("/print", post(print::raw))
        .route("/print-sato", post(print::label))
        .fallback(fallback)
        .method_not_allowed_fallback(fallback)
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(log_request))
}
