//! Request extractors that reject with the API error envelope
//!
//! Axum's stock extractors answer malformed input with plain-text bodies.
//! These wrappers turn every rejection into a 400 `VALIDATION_FAILED`,
//! except an oversized body, which stays a 413.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use beer_review_shared::validation::resolve_page;
use beer_review_shared::{Page, PaginationQuery};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// JSON request body
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::PayloadTooLarge
                } else {
                    ApiError::Validation(rejection.body_text())
                }
            })?;
        Ok(JsonBody(value))
    }
}

/// The `:id` path segment, parsed as a UUID
pub struct PathId(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(PathId(id))
    }
}

/// `limit`/`offset` resolved against the configured defaults
pub struct Paginated(pub Page);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Paginated
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PaginationQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        let app_state = AppState::from_ref(state);
        let defaults = &app_state.config().pagination;
        let page = resolve_page(query, defaults.limit, defaults.offset)?;
        Ok(Paginated(page))
    }
}
