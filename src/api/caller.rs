//! Caller identity extractor.
//!
//! Authentication happens upstream; the gateway forwards the verified identity in
//! `x-user-id` and `x-user-role`.

use super::error::ApiError;
use crate::model::{Caller, UserId};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        };

        let Some(raw_id) = header(USER_ID_HEADER) else {
            warn!(uri = %parts.uri, "Missing caller identity");
            return Err(ApiError::Unauthorized(format!("missing {USER_ID_HEADER} header")));
        };
        let user_id = raw_id.parse::<u32>().map_err(|_| {
            warn!(uri = %parts.uri, value = raw_id, "Malformed caller identity");
            ApiError::Unauthorized(format!("malformed {USER_ID_HEADER} header"))
        })?;
        let is_admin = header(USER_ROLE_HEADER).is_some_and(|r| r.eq_ignore_ascii_case("admin"));

        Ok(Caller {
            user_id: UserId(user_id),
            is_admin,
        })
    }
}
