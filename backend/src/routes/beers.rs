//! Beer API routes

use super::extract::{JsonBody, Paginated, PathId};
use crate::error::ApiResult;
use crate::services::BeerService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use beer_review_shared::{Beer, CreateBeerRequest, ListResponse, UpdateBeerRequest};

/// Create beer routes
pub fn beer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_beers).post(create_beer))
        .route("/:id", get(get_beer_by_id).put(update_beer).delete(delete_beer))
}

/// GET /api/beers
async fn get_all_beers(
    State(state): State<AppState>,
    Paginated(page): Paginated,
) -> ApiResult<Json<ListResponse<Beer>>> {
    let beers = BeerService::get_all(state.repositories(), page).await?;
    Ok(Json(beers))
}

/// POST /api/beers
async fn create_beer(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateBeerRequest>,
) -> ApiResult<(StatusCode, Json<Beer>)> {
    let beer = BeerService::create(state.repositories(), req).await?;
    Ok((StatusCode::CREATED, Json(beer)))
}

/// GET /api/beers/:id
async fn get_beer_by_id(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<Beer>> {
    let beer = BeerService::get_by_id(state.repositories(), id).await?;
    Ok(Json(beer))
}

/// PUT /api/beers/:id
async fn update_beer(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateBeerRequest>,
) -> ApiResult<Json<Beer>> {
    let beer = BeerService::update_by_id(state.repositories(), id, req).await?;
    Ok(Json(beer))
}

/// DELETE /api/beers/:id
async fn delete_beer(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<StatusCode> {
    BeerService::delete_by_id(state.repositories(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
