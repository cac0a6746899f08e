//! Brewery API routes

use super::extract::{JsonBody, Paginated, PathId};
use crate::error::ApiResult;
use crate::services::BreweryService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use beer_review_shared::{Brewery, CreateBreweryRequest, ListResponse, UpdateBreweryRequest};

pub fn brewery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_breweries).post(create_brewery))
        .route(
            "/:id",
            get(get_brewery_by_id).put(update_brewery).delete(delete_brewery),
        )
}

async fn get_all_breweries(
    State(state): State<AppState>,
    Paginated(page): Paginated,
) -> ApiResult<Json<ListResponse<Brewery>>> {
    Ok(Json(BreweryService::get_all(state.repositories(), page).await?))
}

async fn create_brewery(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateBreweryRequest>,
) -> ApiResult<(StatusCode, Json<Brewery>)> {
    let brewery = BreweryService::create(state.repositories(), req).await?;
    Ok((StatusCode::CREATED, Json(brewery)))
}

async fn get_brewery_by_id(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<Brewery>> {
    Ok(Json(BreweryService::get_by_id(state.repositories(), id).await?))
}

async fn update_brewery(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateBreweryRequest>,
) -> ApiResult<Json<Brewery>> {
    Ok(Json(
        BreweryService::update_by_id(state.repositories(), id, req).await?,
    ))
}

async fn delete_brewery(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    BreweryService::delete_by_id(state.repositories(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
