//! HTTP error mapping.
//!
//! | Kind | Status |
//! |---|---|
//! | `Unauthorized` | 401 |
//! | `ValidationError`, `BookNotFound`, `InsufficientStock`, `InvalidTransition` | 400 |
//! | `Forbidden` | 403 |
//! | `OrderNotFound` | 404 |
//! | `PersistenceError` | 500 |
//!
//! Bodies are `{"kind", "message"}` plus the structured context of the error.

use crate::order_actor::OrderError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        OrderError::validation("body", rejection.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        OrderError::validation("query", rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        OrderError::validation("path", rejection.body_text()).into()
    }
}

fn status_of(e: &OrderError) -> StatusCode {
    match e {
        OrderError::ValidationError(_)
        | OrderError::BookNotFound(_)
        | OrderError::InsufficientStock { .. }
        | OrderError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
        OrderError::Forbidden(_) => StatusCode::FORBIDDEN,
        OrderError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        OrderError::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_of(e: &OrderError) -> Value {
    let mut body = json!({ "kind": e.kind(), "message": e.to_string() });
    let context = match e {
        OrderError::ValidationError(errors) => json!({ "errors": errors }),
        OrderError::BookNotFound(book) => json!({ "book": book }),
        OrderError::InsufficientStock {
            book,
            title,
            requested,
            available,
        } => json!({
            "book": book,
            "title": title,
            "requested": requested,
            "available": available,
        }),
        OrderError::OrderNotFound(order) => json!({ "order": order }),
        OrderError::InvalidTransition { from, to } => json!({ "from": from, "to": to }),
        OrderError::Forbidden(_) => Value::Null,
        OrderError::PersistenceError(detail) => {
            error!(error = %detail, "Persistence error");
            // Internals stay in the log.
            body["message"] = json!("Internal server error");
            Value::Null
        }
    };
    if let (Value::Object(body), Value::Object(context)) = (&mut body, context) {
        body.extend(context);
    }
    body
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "kind": "Unauthorized", "message": reason })),
            )
                .into_response(),
            ApiError::Order(e) => (status_of(e), Json(body_of(e))).into_response(),
        }
    }
}
