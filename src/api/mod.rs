//! # HTTP API
//!
//! Thin axum layer over the clients and the query service. Handlers translate requests
//! into client calls and [`OrderError`](crate::order_actor::OrderError) into status codes;
//! no business rule lives here.

pub mod caller;
pub mod error;
pub mod health;
pub mod orders;

pub use error::{ApiError, ApiResult};

use crate::clients::OrderClient;
use crate::lifecycle::OrderSystem;
use crate::query::OrderQueryService;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared handler state. Cloned per request, so it only holds client handles.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderClient,
    pub query: OrderQueryService,
}

impl AppState {
    pub fn new(system: &OrderSystem) -> Self {
        Self {
            orders: system.order_client.clone(),
            query: system.query_service(),
        }
    }
}

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Every route under `/api`, with CORS, tracing and request ids.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(health::router())
        .nest("/orders", orders::router());

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}
