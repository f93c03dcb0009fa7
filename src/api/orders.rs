//! Order routes, nested under `/api/orders`.
//!
//! | Path | Method | Caller |
//! |------|--------|--------|
//! | `/` | POST | customer |
//! | `/` | GET | customer |
//! | `/{id}` | GET | owner or admin |
//! | `/{id}/cancel` | PUT | owner or admin |
//! | `/admin/all` | GET | admin |
//! | `/admin/{id}/status` | PUT | admin |
//! | `/admin/{id}/payment` | PUT | admin |
//! | `/admin/analytics` | GET | admin |
//! | `/admin/sales-report` | GET | admin |

use super::error::ApiResult;
use super::AppState;
use crate::model::{
    Address, Caller, OrderCreate, OrderId, OrderItemRequest, OrderStatus, PaymentMethod,
    PaymentStatus,
};
use crate::order_actor::OrderError;
use crate::query::{
    self, DateRange, GroupBy, OrderAnalytics, OrderFilter, OrderPage, OrderView, PageRequest,
    SalesReport,
};
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order).get(my_orders))
        .route("/{id}", get(order_by_id))
        .route("/{id}/cancel", put(cancel_order))
        .route("/admin/all", get(all_orders))
        .route("/admin/{id}/status", put(update_status))
        .route("/admin/{id}/payment", put(update_payment))
        .route("/admin/analytics", get(analytics))
        .route("/admin/sales-report", get(sales_report))
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: &'static str,
    pub order: OrderView,
}

fn reply(message: &'static str, order: OrderView) -> Json<OrderResponse> {
    Json(OrderResponse { message, order })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderBody {
    pub items: Vec<OrderItemRequest>,
    pub payment_method: PaymentMethod,
    pub shipping_address: Address,
    #[serde(default)]
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelBody {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub status: OrderStatus,
    #[serde(default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminListQuery {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub group_by: Option<String>,
}

async fn place_order(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<PlaceOrderBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    let Json(body) = body?;
    let order = state
        .orders
        .place_order(OrderCreate {
            user_id: caller.user_id,
            items: body.items,
            payment_method: body.payment_method,
            shipping_address: body.shipping_address,
            billing_address: body.billing_address,
            notes: body.notes,
        })
        .await?;
    info!(order_id = %order.id, user_id = %caller.user_id, total = order.totals.total, "Order placed");
    let view = state.query.view(order).await?;
    Ok((StatusCode::CREATED, reply("Order placed successfully", view)))
}

async fn my_orders(
    State(state): State<AppState>,
    caller: Caller,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> ApiResult<Json<OrderPage>> {
    let Query(page) = page?;
    Ok(Json(state.query.get_user_orders(caller, page).await?))
}

async fn order_by_id(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<u32>, PathRejection>,
) -> ApiResult<Json<OrderResponse>> {
    let Path(id) = id?;
    let view = state.query.get_order_by_id(OrderId(id), caller).await?;
    Ok(reply("Order retrieved", view))
}

async fn cancel_order(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<u32>, PathRejection>,
    body: Bytes,
) -> ApiResult<Json<OrderResponse>> {
    let Path(id) = id?;
    // The body is optional; an empty one means no reason.
    let CancelBody { reason } = if body.iter().all(u8::is_ascii_whitespace) {
        CancelBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| OrderError::validation("body", e.to_string()))?
    };
    let order = state
        .orders
        .cancel_order(OrderId(id), caller, reason)
        .await?;
    let view = state.query.view(order).await?;
    Ok(reply("Order cancelled successfully", view))
}

async fn all_orders(
    State(state): State<AppState>,
    caller: Caller,
    params: Result<Query<AdminListQuery>, QueryRejection>,
) -> ApiResult<Json<OrderPage>> {
    query::require_admin(&caller)?;
    let Query(params) = params?;
    let filter = OrderFilter {
        status: params.status,
        payment_status: params.payment_status,
        created: DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?,
    };
    let page = PageRequest {
        page: params.page,
        limit: params.limit,
    };
    Ok(Json(state.query.get_all_orders(caller, filter, page).await?))
}

async fn update_status(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> ApiResult<Json<OrderResponse>> {
    query::require_admin(&caller)?;
    let Path(id) = id?;
    let Json(body) = body?;
    let order = state
        .orders
        .update_status(OrderId(id), body.status, body.estimated_delivery)
        .await?;
    let view = state.query.view(order).await?;
    Ok(reply("Order status updated", view))
}

async fn update_payment(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<u32>, PathRejection>,
    body: Result<Json<PaymentBody>, JsonRejection>,
) -> ApiResult<Json<OrderResponse>> {
    query::require_admin(&caller)?;
    let Path(id) = id?;
    let Json(body) = body?;
    let order = state
        .orders
        .update_payment_status(OrderId(id), body.payment_status, body.payment_id)
        .await?;
    let view = state.query.view(order).await?;
    Ok(reply("Payment status updated", view))
}

async fn analytics(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<OrderAnalytics>> {
    Ok(Json(state.query.analytics(caller).await?))
}

async fn sales_report(
    State(state): State<AppState>,
    caller: Caller,
    params: Result<Query<SalesReportQuery>, QueryRejection>,
) -> ApiResult<Json<SalesReport>> {
    query::require_admin(&caller)?;
    let Query(params) = params?;
    let range = DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?;
    let group_by = GroupBy::parse(params.group_by.as_deref());
    Ok(Json(state.query.sales_report(caller, range, group_by).await?))
}
