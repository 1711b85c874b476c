//! Route modules and router assembly.
//!
//! One module per upstream domain; every handler follows the same shape:
//! parse parameters, call one accessor, normalize, serialize.

pub mod company;
pub mod exchange_rate;
pub mod finance;
pub mod fund;
pub mod gold;
pub mod health;
pub mod listing;
pub mod market;
pub mod msn;
pub mod quote;
pub mod screener;
mod shared;
pub mod trading;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{config::Config, error::ErrorBody, state::AppState};

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, health::readiness_check),
    components(schemas(health::HealthResponse)),
    tags((name = "vnquant"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse().unwrap())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .nest("/quote", quote::router())
        .nest("/listing", listing::router())
        .nest("/company", company::router())
        .nest("/finance", finance::router())
        .nest("/trading", trading::router())
        .nest("/screener", screener::router())
        .nest("/fund", fund::router())
        .nest("/msn", msn::msn_router())
        .nest("/crypto", msn::crypto_router())
        .nest("/forex", msn::forex_router())
        .nest("/market", market::router())
        .nest("/gold", gold::router())
        .nest("/exchange-rate", exchange_rate::router());

    Router::new()
        .merge(health::router())
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Last-resort conversion of an unhandled failure into the uniform error
/// envelope.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unhandled error".to_string()
    };
    tracing::error!("handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("Internal Server Error", detail)),
    )
        .into_response()
}
