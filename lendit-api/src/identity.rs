use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use lendit_core::model::UserId;

/// Header every route reads the acting user from.
pub const SHARER_HEADER: &str = "X-Sharer-User-Id";

/// Caller identity taken from the `X-Sharer-User-Id` header. A missing or
/// non-numeric header is rejected before the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub UserId);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SHARER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Identity(format!("{} header is missing", SHARER_HEADER)))?;

        let id = raw.trim().parse::<UserId>().map_err(|_| {
            ApiError::Identity(format!("{} header is not a valid id: {}", SHARER_HEADER, raw))
        })?;
        Ok(CallerId(id))
    }
}
