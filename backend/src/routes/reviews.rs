//! Review API routes
//!
//! Mutating handlers pass the authenticated caller to the service, which
//! uses it as the author and for the ownership check.

use super::extract::{JsonBody, Paginated, PathId};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ReviewService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use beer_review_shared::{CreateReviewRequest, ListResponse, Review, UpdateReviewRequest};

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_reviews).post(create_review))
        .route(
            "/:id",
            get(get_review_by_id).put(update_review).delete(delete_review),
        )
}

/// GET /api/reviews
async fn get_all_reviews(
    State(state): State<AppState>,
    Paginated(page): Paginated,
) -> ApiResult<Json<ListResponse<Review>>> {
    Ok(Json(ReviewService::get_all(state.repositories(), page).await?))
}

/// POST /api/reviews
async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let review = ReviewService::create(state.repositories(), &auth, req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/reviews/:id
async fn get_review_by_id(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<Review>> {
    Ok(Json(ReviewService::get_by_id(state.repositories(), id).await?))
}

/// PUT /api/reviews/:id
async fn update_review(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateReviewRequest>,
) -> ApiResult<Json<Review>> {
    let review = ReviewService::update_by_id(state.repositories(), &auth, id, req).await?;
    Ok(Json(review))
}

/// DELETE /api/reviews/:id
async fn delete_review(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    ReviewService::delete_by_id(state.repositories(), &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
